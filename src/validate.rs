use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::host_of;

static QUICK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(?:(https?://)?(www\.)?bilibili\.com/video/[a-zA-Z0-9]+)").unwrap(),
        Regex::new(r"^(?:(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)[\w\-]+)").unwrap(),
    ]
});

/// Quick, network-free check used when validating submitted links.
///
/// Accepts the two short-link hosts outright and otherwise requires a
/// canonical watch/video URL shape. Looser links (live rooms, playlists)
/// need the full detector.
pub fn is_supported_video_url(url: &str) -> bool {
    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    };

    if matches!(host_of(&url).as_deref(), Some("b23.tv") | Some("youtu.be")) {
        return true;
    }

    QUICK_PATTERNS.iter().any(|re| re.is_match(&url))
}
