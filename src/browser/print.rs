//! The W3C "Print Page" command, `POST /session/{id}/print`.

use crate::config::PrintConfig;
use crate::error::RenderError;
use base64::Engine;
use fantoccini::wd::WebDriverCompatibleCommand;
use serde_json::{Value, json};

/// Prints the current browsing context to a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct PrintCommand {
    /// Paper width and height in centimetres
    page: (f64, f64),
    background: bool,
}

impl PrintCommand {
    pub fn new(config: &PrintConfig) -> Self {
        Self {
            page: config.paper.dimensions_cm(),
            background: config.background,
        }
    }

    fn body(&self) -> String {
        let (width, height) = self.page;
        json!({
            "orientation": "portrait",
            "scale": 1.0,
            "background": self.background,
            "page": { "width": width, "height": height },
            "shrinkToFit": true,
        })
        .to_string()
    }
}

impl WebDriverCompatibleCommand for PrintCommand {
    fn endpoint(
        &self,
        base_url: &url::Url,
        session_id: Option<&str>,
    ) -> Result<url::Url, url::ParseError> {
        let session_id = session_id.unwrap_or_default();
        base_url.join(&format!("session/{session_id}/print"))
    }

    fn method_and_body(&self, _request_url: &url::Url) -> (http::Method, Option<String>) {
        (http::Method::POST, Some(self.body()))
    }
}

/// Decode the base64 string the print command answers with
pub fn decode_pdf(value: &Value) -> Result<Vec<u8>, RenderError> {
    let encoded = value
        .as_str()
        .ok_or_else(|| RenderError::PdfPayload(format!("expected a base64 string, got {value}")))?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| RenderError::PdfPayload(e.to_string()))
}
