use crate::parsers::ParseResult;
use scraper::{Html, Selector};

/// Parses HTML content to extract the document base and anchor targets
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let base_selector = Selector::parse("base[href]").unwrap();
    let base_href = doc
        .select(&base_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.trim().to_string())
        .next();

    let links = parse_links(&doc);

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::debug!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    ParseResult::new(base_href, links)
}

fn parse_links(doc: &Html) -> Vec<String> {
    // Anchors without an href have no target and are skipped here
    let link_selector = Selector::parse("a[href]").unwrap();
    doc.select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}
