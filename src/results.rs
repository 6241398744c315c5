use url::Url;

/// PDF bytes produced for exactly one page render; never inspected, only merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    bytes: Vec<u8>,
}

impl RenderedPage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A page after navigation, settling and scrolling
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// URL of the document as reported by the browser (after redirects)
    pub url: Url,

    /// Serialized DOM at capture time
    pub html: String,
}

impl LoadedPage {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }
}

/// Same-origin links in first-discovery order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<Url>,
}

impl LinkSet {
    pub fn new(links: Vec<Url>) -> Self {
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.links.iter()
    }

    /// Final page order of a merged document: the seed, then every link in discovery order
    pub fn render_order(&self, seed: &Url) -> Vec<Url> {
        std::iter::once(seed.clone())
            .chain(self.links.iter().cloned())
            .collect()
    }
}

/// Pages from several renders merged into one PDF
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    /// Serialized merged PDF
    pub bytes: Vec<u8>,

    /// URLs in the order their pages appear
    pub sources: Vec<Url>,

    /// Total number of PDF pages
    pub page_count: usize,
}

/// A finished conversion, ready to be written out or sent as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn pdf(file_name: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: "application/pdf",
            bytes,
        }
    }

    /// Value for a `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name)
    }
}
