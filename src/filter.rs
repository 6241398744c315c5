use regex::Regex;
use serde::{Deserialize, Serialize};
use url::{Origin, Url};

/// Configuration for URL filtering during link discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// URL filter that keeps discovered links inside one origin, with optional regex rules on top
#[derive(Debug)]
pub struct UrlFilter {
    origin: Origin,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a filter scoped to the origin of `seed`
    pub fn new(seed: &Url, config: &UrlFilterConfig) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            origin: seed.origin(),
            include_regexes,
            exclude_regexes,
        })
    }

    /// A filter that applies only the origin rule
    pub fn same_origin(seed: &Url) -> Self {
        Self {
            origin: seed.origin(),
            include_regexes: Vec::new(),
            exclude_regexes: Vec::new(),
        }
    }

    /// Determine if a URL may be rendered based on all filtering rules
    pub fn should_render(&self, url: &Url) -> bool {
        if !self.is_same_origin(url) {
            return false;
        }

        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|regex| regex.is_match(url_str)) {
            return false;
        }

        if !self.include_regexes.is_empty()
            && !self.include_regexes.iter().any(|regex| regex.is_match(url_str))
        {
            return false;
        }

        true
    }

    /// Scheme, host and port must all match the seed
    pub fn is_same_origin(&self, url: &Url) -> bool {
        // Opaque origins (mailto:, data:, ...) never compare equal to a tuple origin
        url.origin() == self.origin
    }

    /// Create a normalized version of the URL (fragment removed)
    pub fn normalize_url(url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}
