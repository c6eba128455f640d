use log::debug;

use crate::normalize::host_of;
use crate::platforms::PlatformTables;
use crate::{DetectionMethod, DetectionResult};

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const PARTIAL_CONFIDENCE: f64 = 0.9;

/// Classify a normalized URL by its hostname.
///
/// An exact hit wins outright. Otherwise the first table entry (in
/// declaration order) whose key contains the host, or is contained by it,
/// is taken as a partial hit. Unparseable input is simply not a hit.
pub fn classify_by_domain(tables: &PlatformTables, url: &str) -> Option<DetectionResult> {
    let host = host_of(url)?;

    if let Some((_, platform)) = tables.domains.iter().find(|(key, _)| *key == host) {
        debug!("Exact domain match: {host} -> {platform}");
        return Some(DetectionResult::new(platform, EXACT_CONFIDENCE, DetectionMethod::Domain, url));
    }

    let (key, platform) = tables
        .domains
        .iter()
        .find(|(key, _)| host.contains(key) || key.contains(host.as_str()))?;
    debug!("Partial domain match: {host} ~ {key} -> {platform}");
    Some(DetectionResult::new(
        platform,
        PARTIAL_CONFIDENCE,
        DetectionMethod::DomainPartial,
        url,
    ))
}
