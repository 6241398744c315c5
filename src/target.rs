use crate::error::InputError;
use url::Url;

/// Scheme assumed when the caller gives a bare hostname
pub const DEFAULT_SCHEME: &str = "https://";

/// Turns user input into the absolute URL that will be rendered.
///
/// Input without a `scheme://` prefix gets `https://` prepended. No other
/// correction is attempted; reachability is only discovered when the page is
/// loaded.
pub fn normalize_target(input: &str) -> Result<Url, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|source| InputError::Invalid {
        input: trimmed.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(InputError::UnsupportedScheme {
            input: trimmed.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// True when the input starts with an RFC 3986 scheme followed by `://`
fn has_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(end) if end > 0 => {
            let scheme = &input[..end];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
