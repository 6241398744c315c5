//! Chrome DevTools commands tunnelled through chromedriver.
//!
//! WebDriver has no notion of device scale factor or emulated media type.
//! chromedriver exposes a vendor endpoint, `POST /session/{id}/goog/cdp/execute`,
//! that forwards a DevTools command to the current browsing context.

use crate::config::Viewport;
use fantoccini::wd::WebDriverCompatibleCommand;
use serde_json::{Value, json};

/// A single DevTools method call
#[derive(Debug, Clone, PartialEq)]
pub struct DevToolsCommand {
    method: &'static str,
    params: Value,
}

impl DevToolsCommand {
    pub fn new(method: &'static str, params: Value) -> Self {
        Self { method, params }
    }

    /// Size the layout viewport and set the device pixel ratio
    pub fn device_metrics(viewport: &Viewport) -> Self {
        Self::new(
            "Emulation.setDeviceMetricsOverride",
            json!({
                "width": viewport.width,
                "height": viewport.height,
                "deviceScaleFactor": viewport.scale_factor,
                "mobile": false,
            }),
        )
    }

    /// Apply `@media screen` rules instead of `@media print` when printing
    pub fn emulate_screen_media() -> Self {
        Self::new("Emulation.setEmulatedMedia", json!({ "media": "screen" }))
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    fn body(&self) -> String {
        json!({ "cmd": self.method, "params": self.params }).to_string()
    }
}

impl WebDriverCompatibleCommand for DevToolsCommand {
    fn endpoint(
        &self,
        base_url: &url::Url,
        session_id: Option<&str>,
    ) -> Result<url::Url, url::ParseError> {
        let session_id = session_id.unwrap_or_default();
        base_url.join(&format!("session/{session_id}/goog/cdp/execute"))
    }

    fn method_and_body(&self, _request_url: &url::Url) -> (http::Method, Option<String>) {
        (http::Method::POST, Some(self.body()))
    }
}
