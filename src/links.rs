use crate::config::{LinkConfig, MAX_DISCOVERED_LINKS};
use crate::filter::{UrlFilter, UrlFilterConfig};
use crate::parsers::html;
use crate::results::{LinkSet, LoadedPage};
use std::collections::HashSet;
use url::Url;

/// Finds the internal pages of a site that go into a multi-page document
#[derive(Debug)]
pub struct LinkDiscoverer {
    filter: UrlFilter,
    seed: Url,
    max_links: usize,
}

impl LinkDiscoverer {
    /// Create a discoverer for the site rooted at `seed`
    pub fn new(seed: &Url, config: &LinkConfig) -> Result<Self, regex::Error> {
        let filter_config = UrlFilterConfig {
            include_patterns: config.include_patterns.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
        };

        Ok(Self {
            filter: UrlFilter::new(seed, &filter_config)?,
            seed: UrlFilter::normalize_url(seed),
            max_links: config.effective_max_links(),
        })
    }

    /// Discoverer with only the origin rule and the default cap
    pub fn same_origin(seed: &Url) -> Self {
        Self {
            filter: UrlFilter::same_origin(seed),
            seed: UrlFilter::normalize_url(seed),
            max_links: MAX_DISCOVERED_LINKS,
        }
    }

    /// Extract same-origin links from a loaded page, in first-seen order.
    ///
    /// Targets are resolved the way the browser resolves `a.href`: against
    /// `<base href>` when present, otherwise against the page URL.
    pub fn discover(&self, page: &LoadedPage) -> LinkSet {
        let parsed = html::parse(&page.html);
        let base = document_base(&page.url, parsed.base_href.as_deref());

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for href in &parsed.links {
            if links.len() >= self.max_links {
                break;
            }

            let Some(resolved) = resolve(&base, href) else {
                ::log::trace!("Discarding invalid link target: {:?}", href);
                continue;
            };

            if !seen.insert(resolved.as_str().to_owned()) {
                continue;
            }

            if !self.filter.should_render(&resolved) {
                ::log::debug!("URL filter rejected: {}", resolved);
                continue;
            }

            if resolved == self.seed {
                continue;
            }

            ::log::debug!("URL filter accepted: {}", resolved);
            links.push(resolved);
        }

        ::log::info!(
            "Discovered {} internal links on {} ({} anchors)",
            links.len(),
            page.url,
            parsed.links.len()
        );

        LinkSet::new(links)
    }
}

/// Base URL for resolving relative targets in a document
fn document_base(page_url: &Url, base_href: Option<&str>) -> Url {
    base_href
        .filter(|href| !href.is_empty())
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// Resolve an `href` to an absolute http(s) URL without fragment
fn resolve(base: &Url, href: &str) -> Option<Url> {
    let resolved = base.join(href.trim()).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    Some(UrlFilter::normalize_url(&resolved))
}
