use url::Url;

const DEFAULT_SCHEME: &str = "https://";

/// Repair a raw input string into an absolute URL.
///
/// Returns the (possibly scheme-prefixed) string and whether it parses with
/// both a scheme and a host. Never fails; callers decide what invalid means.
pub fn normalize_url(input: &str) -> (String, bool) {
    let url = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{input}")
    };
    let valid = parse_absolute(&url).is_some();
    (url, valid)
}

/// Parse a string that must carry a scheme and a non-empty host
pub fn parse_absolute(input: &str) -> Option<Url> {
    let parsed = Url::parse(input).ok()?;
    if parsed.scheme().is_empty() {
        return None;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed),
        _ => None,
    }
}

/// Lower-cased host of an absolute URL
pub fn host_of(input: &str) -> Option<String> {
    parse_absolute(input).and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}
