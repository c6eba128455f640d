use log::debug;

use crate::platforms::PlatformTables;
use crate::{DetectionMethod, DetectionResult};

pub const PATTERN_CONFIDENCE: f64 = 0.95;

/// Classify a normalized URL against the per-platform URL-shape rules.
///
/// Platforms and their variants are tried in registration order and the
/// first rule matching at the start of the URL wins.
pub fn classify_by_pattern(tables: &PlatformTables, url: &str) -> Option<DetectionResult> {
    tables.patterns.iter().find_map(|platform| {
        platform
            .patterns
            .iter()
            .find(|def| def.regex.is_match(url))
            .map(|def| {
                debug!("Pattern match: {} ({}) for {url}", platform.platform, def.name);
                DetectionResult::new(platform.platform, PATTERN_CONFIDENCE, DetectionMethod::Pattern, url)
                    .with_info("pattern_name", def.name)
            })
    })
}
