use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Hard ceiling on discovered links; with the seed this bounds a document to 10 pages
pub const MAX_DISCOVERED_LINKS: usize = 9;

/// Top-level configuration for a conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Browser session settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Per-page rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Link discovery settings for multi-page documents
    #[serde(default)]
    pub links: LinkConfig,
}

/// Settings for the browser session requested from WebDriver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run Chrome without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Extra command-line switches passed to Chrome
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,
}

/// Viewport used for every browsing context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_viewport_width")]
    pub width: u32,

    #[serde(default = "default_viewport_height")]
    pub height: u32,

    /// Device pixel ratio; 2 gives sharper text and images in the output
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

/// What to wait for between DOM content parsed and capture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaitPolicy {
    /// Pause for a fixed time
    Settle { delay_ms: u64 },

    /// Poll `document.readyState` until it is `complete`, giving up after `max_wait_ms`
    DocumentComplete { poll_ms: u64, max_wait_ms: u64 },
}

/// Incremental scrolling that triggers lazy-loaded content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Pixels scrolled per step
    #[serde(default = "default_scroll_step")]
    pub step_px: u64,

    /// Pause after each step
    #[serde(default = "default_scroll_tick")]
    pub tick_ms: u64,

    /// Upper bound on steps; pages that keep growing are truncated here
    #[serde(default = "default_scroll_max_steps")]
    pub max_steps: u32,
}

/// Paper sizes understood by the WebDriver print command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    A4,
    Letter,
    Legal,
}

/// Settings for the PDF snapshot of each page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    #[serde(default = "default_paper_size")]
    pub paper: PaperSize,

    /// Include background colors and images
    #[serde(default = "default_print_background")]
    pub background: bool,
}

/// Everything the page renderer needs to know
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub viewport: Viewport,

    /// Upper bound on navigation, in seconds
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    #[serde(default = "default_wait_policy")]
    pub wait: WaitPolicy,

    /// Force `screen` media so print stylesheets are not applied
    #[serde(default = "default_emulate_screen")]
    pub emulate_screen: bool,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub print: PrintConfig,
}

/// Settings for internal link discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Maximum number of links rendered after the seed page (capped at 9)
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Regex patterns for URLs to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl ConverterConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` environment variable if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            browser: BrowserConfig::default(),
            render: RenderConfig::default(),
            links: LinkConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            args: default_browser_args(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            scale_factor: default_scale_factor(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step_px: default_scroll_step(),
            tick_ms: default_scroll_tick(),
            max_steps: default_scroll_max_steps(),
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            paper: default_paper_size(),
            background: default_print_background(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            navigation_timeout_secs: default_navigation_timeout(),
            wait: default_wait_policy(),
            emulate_screen: default_emulate_screen(),
            scroll: ScrollConfig::default(),
            print: PrintConfig::default(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_links: default_max_links(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl PaperSize {
    /// Width and height in centimetres, as the print command expects them
    pub fn dimensions_cm(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (21.0, 29.7),
            PaperSize::Letter => (21.59, 27.94),
            PaperSize::Legal => (21.59, 35.56),
        }
    }
}

impl RenderConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

impl ScrollConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl LinkConfig {
    /// The configured cap, clamped to the hard ceiling
    pub fn effective_max_links(&self) -> usize {
        self.max_links.min(MAX_DISCOVERED_LINKS)
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_browser_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
    ]
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    2000
}

fn default_scale_factor() -> f64 {
    2.0
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_wait_policy() -> WaitPolicy {
    WaitPolicy::Settle { delay_ms: 3000 }
}

fn default_emulate_screen() -> bool {
    true
}

fn default_scroll_step() -> u64 {
    300
}

fn default_scroll_tick() -> u64 {
    200
}

fn default_scroll_max_steps() -> u32 {
    200
}

fn default_paper_size() -> PaperSize {
    PaperSize::A4
}

fn default_print_background() -> bool {
    true
}

fn default_max_links() -> usize {
    MAX_DISCOVERED_LINKS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_renderer_contract() {
        let config = ConverterConfig::default();

        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.render.viewport.width, 1280);
        assert_eq!(config.render.viewport.height, 2000);
        assert_eq!(config.render.viewport.scale_factor, 2.0);
        assert_eq!(config.render.navigation_timeout(), Duration::from_secs(60));
        assert_eq!(config.render.wait, WaitPolicy::Settle { delay_ms: 3000 });
        assert_eq!(config.render.scroll.step_px, 300);
        assert_eq!(config.render.scroll.tick(), Duration::from_millis(200));
        assert_eq!(config.render.print.paper, PaperSize::A4);
        assert!(config.render.print.background);
        assert!(config.render.emulate_screen);
        assert_eq!(config.links.effective_max_links(), 9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "webdriver_url": "http://localhost:9515",
            "render": {
                "wait": { "kind": "document_complete", "poll_ms": 100, "max_wait_ms": 5000 },
                "scroll": { "max_steps": 10 }
            },
            "links": { "exclude_patterns": ["/logout"] }
        }"#;
        let config = ConverterConfig::from_json(json).unwrap();

        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert_eq!(
            config.render.wait,
            WaitPolicy::DocumentComplete {
                poll_ms: 100,
                max_wait_ms: 5000
            }
        );
        assert_eq!(config.render.scroll.max_steps, 10);
        assert_eq!(config.render.scroll.step_px, 300);
        assert_eq!(config.render.viewport, Viewport::default());
        assert_eq!(config.links.exclude_patterns, vec!["/logout".to_string()]);
        assert_eq!(config.links.max_links, 9);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_max_links_is_clamped() {
        let config = LinkConfig {
            max_links: 50,
            ..LinkConfig::default()
        };
        assert_eq!(config.effective_max_links(), 9);

        let config = LinkConfig {
            max_links: 3,
            ..LinkConfig::default()
        };
        assert_eq!(config.effective_max_links(), 3);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ConverterConfig::from_json("{ not json").is_err());
    }
}
