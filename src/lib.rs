pub mod config;
pub mod detector;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod output;
pub mod pattern;
pub mod platforms;
pub mod resolve;
pub mod validate;

use std::collections::BTreeMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Serialize;

pub use detector::PlatformDetector;
pub use error::{DetectError, Result};
pub use extract::{VideoIdExtractor, VideoSource};

/// How a platform was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Domain,
    DomainPartial,
    Pattern,
    HttpRedirect,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Domain => "domain",
            DetectionMethod::DomainPartial => "domain_partial",
            DetectionMethod::Pattern => "pattern",
            DetectionMethod::HttpRedirect => "http_redirect",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a successful platform detection.
///
/// Built once by the tier that recognized the URL; callers only read it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    platform: String,
    confidence: f64,
    original_url: String,
    normalized_url: String,
    extra_info: BTreeMap<String, String>,
}

impl DetectionResult {
    pub(crate) fn new(platform: &str, confidence: f64, method: DetectionMethod, url: &str) -> Self {
        let mut extra_info = BTreeMap::new();
        extra_info.insert("detection_method".to_string(), method.as_str().to_string());
        Self {
            platform: platform.to_string(),
            confidence,
            original_url: url.to_string(),
            normalized_url: url.to_string(),
            extra_info,
        }
    }

    pub(crate) fn with_info(mut self, key: &str, value: &str) -> Self {
        self.extra_info.insert(key.to_string(), value.to_string());
        self
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Input URL, with the default scheme added if it had none
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// URL after short-link resolution; equal to `original_url` otherwise
    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    pub fn extra_info(&self) -> &BTreeMap<String, String> {
        &self.extra_info
    }

    /// The `detection_method` entry of `extra_info`
    pub fn detection_method(&self) -> &str {
        self.extra_info
            .get("detection_method")
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The `pattern_name` entry, present only for pattern matches
    pub fn pattern_name(&self) -> Option<&str> {
        self.extra_info.get("pattern_name").map(String::as_str)
    }
}

static DEFAULT_DETECTOR: Lazy<PlatformDetector> = Lazy::new(PlatformDetector::new);

/// Detect the platform of `url` with the process-wide default detector
pub async fn detect_platform(url: &str, timeout: Option<Duration>) -> Result<DetectionResult> {
    DEFAULT_DETECTOR.detect_platform(url, timeout).await
}

/// Whether `url` belongs to a supported platform
pub async fn is_supported_url(url: &str) -> bool {
    DEFAULT_DETECTOR.is_supported_url(url).await
}

/// Registered platform identifiers, in registration order
pub fn get_supported_platforms() -> Vec<String> {
    DEFAULT_DETECTOR.supported_platforms()
}

/// Extract the platform-native video ID from a URL or a detection result
pub async fn extract_video_id<'a>(source: impl Into<VideoSource<'a>>, platform: Option<&str>) -> Result<String> {
    VideoIdExtractor::new(DEFAULT_DETECTOR.resolver().clone())
        .extract_video_id(source, platform)
        .await
}
