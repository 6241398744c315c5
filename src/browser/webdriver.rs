use crate::browser::PageRenderer;
use crate::browser::context::{self, ClientWindows};
use crate::browser::devtools::DevToolsCommand;
use crate::browser::print::{self, PrintCommand};
use crate::browser::scroll::{self, ScrollTarget};
use crate::config::{BrowserConfig, ConverterConfig, RenderConfig, WaitPolicy};
use crate::error::RenderError;
use crate::results::{LoadedPage, RenderedPage};
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::wd::{Capabilities, WindowHandle};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use url::Url;

/// Endpoints tried when the configured WebDriver server does not answer
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Script timeout for the small evaluations used while preparing a page
const SCRIPT_TIMEOUT_MS: u64 = 30_000;

/// One headless Chrome session driven over WebDriver.
///
/// Every `load`/`render` opens a fresh top-level window, prepares the page in
/// it and closes it again, returning to the session's initial window.
pub struct WebDriverEngine {
    client: Client,
    home: WindowHandle,
    config: RenderConfig,
}

impl WebDriverEngine {
    /// Start a browser session on the configured WebDriver server
    pub async fn launch(config: &ConverterConfig) -> Result<Self, RenderError> {
        ::log::info!("Launching browser via WebDriver at {}", config.webdriver_url);

        let capabilities = capabilities(&config.browser, &config.render);
        let client = connect(&config.webdriver_url, &capabilities).await?;

        let home = match client.window().await {
            Ok(handle) => handle,
            Err(source) => {
                close_client(client).await;
                return Err(RenderError::Command {
                    action: "reading the initial window",
                    source,
                });
            }
        };

        Ok(Self {
            client,
            home,
            config: config.render.clone(),
        })
    }

    async fn open_context(&self) -> Result<(), RenderError> {
        context::open_context(&mut ClientWindows(&self.client), &self.home).await
    }

    async fn close_context(&self) {
        context::close_context(&mut ClientWindows(&self.client), &self.home).await;
    }

    /// Viewport, navigation, wait policy, media emulation and auto-scroll, in that order
    async fn prepare(&self, url: &Url) -> Result<(), RenderError> {
        let started = Instant::now();

        self.client
            .issue_cmd(DevToolsCommand::device_metrics(&self.config.viewport))
            .await
            .map_err(RenderError::command("sizing the viewport"))?;

        self.navigate(url).await?;
        self.wait_until_ready().await?;

        if self.config.emulate_screen {
            self.client
                .issue_cmd(DevToolsCommand::emulate_screen_media())
                .await
                .map_err(RenderError::command("emulating screen media"))?;
        }

        let mut target = ClientScroll(&self.client);
        scroll::auto_scroll(&mut target, &self.config.scroll).await?;

        ::log::debug!(
            "Prepared {} in {:.2} seconds",
            url,
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }

    async fn navigate(&self, url: &Url) -> Result<(), RenderError> {
        let limit = self.config.navigation_timeout();
        ::log::debug!("Navigating to {}", url);

        match timeout(limit, self.client.goto(url.as_str())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(navigation_error(url, limit, source)),
            Err(_) => Err(RenderError::NavigationTimeout {
                url: url.to_string(),
                secs: limit.as_secs(),
            }),
        }
    }

    async fn wait_until_ready(&self) -> Result<(), RenderError> {
        match self.config.wait {
            WaitPolicy::Settle { delay_ms } => {
                sleep(Duration::from_millis(delay_ms)).await;
            }
            WaitPolicy::DocumentComplete {
                poll_ms,
                max_wait_ms,
            } => {
                let deadline = Instant::now() + Duration::from_millis(max_wait_ms);
                loop {
                    let state = self
                        .client
                        .execute("return document.readyState;", vec![])
                        .await
                        .map_err(RenderError::command("reading document.readyState"))?;
                    if state.as_str() == Some("complete") {
                        break;
                    }
                    if Instant::now() >= deadline {
                        ::log::warn!(
                            "Document still '{}' after {}ms, capturing anyway",
                            state,
                            max_wait_ms
                        );
                        break;
                    }
                    sleep(Duration::from_millis(poll_ms)).await;
                }
            }
        }
        Ok(())
    }

    async fn print(&self) -> Result<RenderedPage, RenderError> {
        let payload = self
            .client
            .issue_cmd(PrintCommand::new(&self.config.print))
            .await
            .map_err(RenderError::command("printing to PDF"))?;
        Ok(RenderedPage::new(print::decode_pdf(&payload)?))
    }

    async fn load_in_context(&self, url: &Url) -> Result<LoadedPage, RenderError> {
        self.prepare(url).await?;

        let html = self
            .client
            .source()
            .await
            .map_err(RenderError::command("reading the page source"))?;
        let current = self
            .client
            .current_url()
            .await
            .map_err(RenderError::command("reading the current URL"))?;

        Ok(LoadedPage::new(current, html))
    }

    async fn render_in_context(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        self.prepare(url).await?;
        let page = self.print().await?;
        ::log::info!("Rendered {} ({} bytes)", url, page.len());
        Ok(page)
    }
}

impl PageRenderer for WebDriverEngine {
    async fn load(&mut self, url: &Url) -> Result<LoadedPage, RenderError> {
        self.open_context().await?;
        let result = self.load_in_context(url).await;
        self.close_context().await;
        result
    }

    async fn render(&mut self, url: &Url) -> Result<RenderedPage, RenderError> {
        self.open_context().await?;
        let result = self.render_in_context(url).await;
        self.close_context().await;
        result
    }

    async fn close(self) {
        close_client(self.client).await;
    }
}

/// Scrolls the current browsing context of a session
struct ClientScroll<'a>(&'a Client);

impl ScrollTarget for ClientScroll<'_> {
    async fn scroll_height(&mut self) -> Result<u64, RenderError> {
        let value = self
            .0
            .execute(
                "return document.body ? document.body.scrollHeight : 0;",
                vec![],
            )
            .await
            .map_err(RenderError::command("reading the scroll height"))?;

        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0).ceil() as u64))
            .ok_or_else(|| RenderError::Evaluation {
                action: "reading the scroll height",
                message: format!("expected a number, got {value}"),
            })
    }

    async fn scroll_by(&mut self, px: u64) -> Result<(), RenderError> {
        self.0
            .execute("window.scrollBy(0, arguments[0]);", vec![json!(px)])
            .await
            .map_err(RenderError::command("scrolling"))?;
        Ok(())
    }
}

/// Session capabilities: headless Chrome, DOM-content-loaded navigation, bounded page load
pub fn capabilities(browser: &BrowserConfig, render: &RenderConfig) -> Capabilities {
    let mut args = Vec::new();
    if browser.headless {
        args.push("--headless=new".to_string());
    }
    args.push(format!(
        "--window-size={},{}",
        render.viewport.width, render.viewport.height
    ));
    args.extend(browser.args.iter().cloned());

    let mut capabilities = Capabilities::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("pageLoadStrategy".to_string(), json!("eager"));
    capabilities.insert(
        "timeouts".to_string(),
        json!({
            "pageLoad": render.navigation_timeout_secs * 1000,
            "script": SCRIPT_TIMEOUT_MS,
        }),
    );
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

/// Connects to the WebDriver server, falling back to well-known local endpoints
async fn connect(webdriver_url: &str, capabilities: &Capabilities) -> Result<Client, RenderError> {
    let first_error = match try_connect(webdriver_url, capabilities).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => e,
    };
    ::log::error!(
        "Failed to connect to WebDriver at {}: {}",
        webdriver_url,
        first_error
    );

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = try_connect(url, capabilities).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(RenderError::Launch {
        endpoint: webdriver_url.to_string(),
        message: first_error.to_string(),
    })
}

async fn try_connect(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(webdriver_url).await
}

/// Only the WebDriver `timeout` status counts as the page-load bound expiring
fn navigation_error(url: &Url, limit: Duration, source: CmdError) -> RenderError {
    if source.is_timeout() {
        RenderError::NavigationTimeout {
            url: url.to_string(),
            secs: limit.as_secs(),
        }
    } else {
        RenderError::Command {
            action: "navigating",
            source,
        }
    }
}

/// Ends the session; chromedriver shuts the browser process down with it
async fn close_client(client: Client) {
    match client.close().await {
        Ok(()) => ::log::debug!("Browser session closed"),
        Err(e) => ::log::warn!("Failed to close browser session: {}", e),
    }
}
