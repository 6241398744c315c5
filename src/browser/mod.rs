pub mod context;
pub mod devtools;
pub mod print;
pub mod scroll;
pub mod webdriver;

pub use webdriver::WebDriverEngine;

use crate::error::RenderError;
use crate::results::{LoadedPage, RenderedPage};
use url::Url;

/// The browser capability the conversion pipeline is built on.
///
/// Each call opens its own browsing context and releases it before
/// returning. Calls on one renderer are awaited one at a time.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Navigate, settle and scroll `url`, then return its document for link discovery
    async fn load(&mut self, url: &Url) -> Result<LoadedPage, RenderError>;

    /// Navigate, settle and scroll `url`, then print it to PDF
    async fn render(&mut self, url: &Url) -> Result<RenderedPage, RenderError>;

    /// Shut the engine down. Called exactly once, after the last load or render.
    async fn close(self);
}
