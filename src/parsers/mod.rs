pub mod html;


/// Raw hyperlink data pulled out of an HTML document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    /// Value of the first `<base href>`, if the document declares one
    pub base_href: Option<String>,
    /// `href` attributes of every `<a>` element, in document order
    pub links: Vec<String>,
}

impl ParseResult {
    /// Creates a new parse result with the given base and links
    pub fn new(base_href: Option<String>, links: Vec<String>) -> Self {
        Self { base_href, links }
    }
}
