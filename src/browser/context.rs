use crate::error::RenderError;
use fantoccini::Client;
use fantoccini::error::CmdError;
use fantoccini::wd::WindowHandle;

/// Top-level window operations of a session
#[allow(async_fn_in_trait)]
pub trait Windows {
    type Handle: Clone;

    /// Open a new tab without switching to it
    async fn open(&mut self) -> Result<Self::Handle, CmdError>;

    async fn switch_to(&mut self, handle: Self::Handle) -> Result<(), CmdError>;

    /// Close whichever window is current
    async fn close_current(&mut self) -> Result<(), CmdError>;
}

/// Open a fresh window and make it current.
///
/// If the switch fails the new window is closed again, so a failed call
/// never leaves a window behind.
pub async fn open_context<W: Windows>(windows: &mut W, home: &W::Handle) -> Result<(), RenderError> {
    let handle = windows
        .open()
        .await
        .map_err(RenderError::command("opening a browsing context"))?;

    if let Err(source) = windows.switch_to(handle.clone()).await {
        discard(windows, handle, home).await;
        return Err(RenderError::Command {
            action: "switching to a browsing context",
            source,
        });
    }
    Ok(())
}

/// Close the current window and return to `home`
pub async fn close_context<W: Windows>(windows: &mut W, home: &W::Handle) {
    if let Err(e) = windows.close_current().await {
        ::log::warn!("Failed to close browsing context: {}", e);
    }
    return_home(windows, home).await;
}

/// WebDriver can only close the current window, so the window is closed only
/// once switching to it succeeds. Otherwise `home` would be closed instead.
async fn discard<W: Windows>(windows: &mut W, handle: W::Handle, home: &W::Handle) {
    let closed = match windows.switch_to(handle).await {
        Ok(()) => windows.close_current().await,
        Err(e) => Err(e),
    };
    if let Err(e) = closed {
        ::log::warn!("Failed to close an unused browsing context: {}", e);
    }
    return_home(windows, home).await;
}

async fn return_home<W: Windows>(windows: &mut W, home: &W::Handle) {
    if let Err(e) = windows.switch_to(home.clone()).await {
        ::log::warn!("Failed to switch back to the initial window: {}", e);
    }
}

/// Window operations on a live session
pub struct ClientWindows<'a>(pub &'a Client);

impl Windows for ClientWindows<'_> {
    type Handle = WindowHandle;

    async fn open(&mut self) -> Result<WindowHandle, CmdError> {
        Ok(self.0.new_window(true).await?.handle)
    }

    async fn switch_to(&mut self, handle: WindowHandle) -> Result<(), CmdError> {
        self.0.switch_to_window(handle).await
    }

    async fn close_current(&mut self) -> Result<(), CmdError> {
        self.0.close_window().await
    }
}
