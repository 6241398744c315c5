use thiserror::Error;

/// Problems with the URL supplied by the caller
#[derive(Debug, Error)]
pub enum InputError {
    /// Nothing left after trimming whitespace
    #[error("No URL was provided")]
    Empty,

    /// The (possibly scheme-prefixed) input is not a valid absolute URL
    #[error("Invalid URL '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Only http and https pages can be rendered
    #[error("Unsupported URL scheme '{scheme}' in '{input}'")]
    UnsupportedScheme { input: String, scheme: String },
}

/// Failures while driving the browser
#[derive(Debug, Error)]
pub enum RenderError {
    /// No WebDriver endpoint accepted a new session
    #[error("Failed to launch browser session via {endpoint}: {message}")]
    Launch { endpoint: String, message: String },

    /// Navigation did not reach DOM content parsed in time
    #[error("Navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    /// A WebDriver command failed
    #[error("Failed while {action}: {source}")]
    Command {
        action: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    /// A script evaluated in the page returned something unusable
    #[error("Page evaluation failed while {action}: {message}")]
    Evaluation {
        action: &'static str,
        message: String,
    },

    /// The print command answered with something other than base64 PDF data
    #[error("Browser returned an unusable PDF: {0}")]
    PdfPayload(String),
}

impl RenderError {
    /// Builds a mapper for `map_err` that tags a WebDriver failure with what was being done
    pub fn command(action: &'static str) -> impl FnOnce(fantoccini::error::CmdError) -> Self {
        move |source| RenderError::Command { action, source }
    }
}

/// Failures while building the merged document
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// One of the constituent pages could not be rendered
    #[error("Failed to render {url}: {source}")]
    Render {
        url: String,
        #[source]
        source: RenderError,
    },

    /// Rendered bytes for a page could not be loaded as a PDF
    #[error("Rendered PDF for {url} could not be loaded: {source}")]
    Load {
        url: String,
        #[source]
        source: lopdf::Error,
    },

    /// A page object in a rendered PDF is malformed
    #[error("Malformed page in rendered PDF for {url}: {message}")]
    MalformedPage { url: String, message: String },

    /// Nothing was appended before serializing
    #[error("No pages to merge")]
    Empty,

    /// The merged document could not be written out
    #[error("Failed to serialize merged PDF: {0}")]
    Save(String),
}

/// Any failure of a conversion request
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// An include/exclude link pattern does not compile
    #[error("Invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),
}
