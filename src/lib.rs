// Re-export modules
pub mod assemble;
pub mod browser;
pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod links;
pub mod parsers;
pub mod pdf;
pub mod results;
pub mod target;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use convert::{Mode, convert};
pub use error::ConvertError;
pub use results::Attachment;

/// Main builder for turning a website into a PDF
pub struct SitePdf {
    url: String,
    config: config::ConverterConfig,
}

impl SitePdf {
    /// Create a new builder for the given URL; a missing scheme defaults to https
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: config::ConverterConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: config::ConverterConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::ConverterConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::ConverterConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the WebDriver server to connect to
    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.webdriver_url = webdriver_url.into();
        self
    }

    /// Set how many linked pages follow the seed in a multi-page document (at most 9)
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.config.links.max_links = max_links;
        self
    }

    /// Wait a fixed number of milliseconds after DOM content is parsed
    pub fn with_settle_delay(mut self, delay_ms: u64) -> Self {
        self.config.render.wait = config::WaitPolicy::Settle { delay_ms };
        self
    }

    /// The configuration a conversion would run with
    pub fn config(&self) -> &config::ConverterConfig {
        &self.config
    }

    /// Run the conversion in the given mode
    pub async fn generate(&self, mode: Mode) -> Result<Attachment, ConvertError> {
        convert(&self.config, &self.url, mode).await
    }

    /// Render only the requested page
    pub async fn single_page(&self) -> Result<Attachment, ConvertError> {
        self.generate(Mode::SinglePage).await
    }

    /// Render the requested page followed by the same-origin pages it links to
    pub async fn multi_page(&self) -> Result<Attachment, ConvertError> {
        self.generate(Mode::MultiPage).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let pdf = SitePdf::new("example.com")
            .with_webdriver_url("http://localhost:9515")
            .with_max_links(3)
            .with_settle_delay(500);

        assert_eq!(pdf.config().webdriver_url, "http://localhost:9515");
        assert_eq!(pdf.config().links.effective_max_links(), 3);
        assert_eq!(
            pdf.config().render.wait,
            config::WaitPolicy::Settle { delay_ms: 500 }
        );
    }

    #[test]
    fn test_builder_config_str() {
        let pdf = SitePdf::new("example.com")
            .with_config_str(r#"{ "links": { "max_links": 2 } }"#)
            .unwrap();
        assert_eq!(pdf.config().links.max_links, 2);
        assert_eq!(pdf.config().webdriver_url, "http://localhost:4444");
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let err = SitePdf::new("").multi_page().await.unwrap_err();
        assert!(matches!(err, ConvertError::Input(_)));
    }
}
