use thiserror::Error;

/// Errors surfaced by platform detection and video ID extraction.
///
/// The classifier tiers never produce these; only the detector and the
/// extractor do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("invalid video URL: {url}")]
    InvalidUrl { url: String },

    #[error("unsupported video platform: {url}")]
    UnsupportedPlatform { url: String },

    #[error("platform detection timed out: {url}")]
    DetectionTimeout { url: String },

    #[error("platform detection failed for {url}: {message}")]
    DetectionError { url: String, message: String },

    #[error("could not extract a {platform} video ID from {url}")]
    VideoIdExtractionFailed { url: String, platform: String },
}

pub type Result<T> = std::result::Result<T, DetectError>;

impl DetectError {
    /// Numeric code reported in the response envelope
    pub fn code(&self) -> i64 {
        match self {
            DetectError::UnsupportedPlatform { .. } => 300201,
            DetectError::InvalidUrl { .. } => 300202,
            DetectError::DetectionTimeout { .. } => 300203,
            DetectError::DetectionError { .. } => 300204,
            DetectError::VideoIdExtractionFailed { .. } => 300205,
        }
    }

    /// Stable string identifier for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DetectError::UnsupportedPlatform { .. } => "UNSUPPORTED_PLATFORM",
            DetectError::InvalidUrl { .. } => "INVALID_VIDEO_URL",
            DetectError::DetectionTimeout { .. } => "PLATFORM_DETECTION_TIMEOUT",
            DetectError::DetectionError { .. } => "PLATFORM_DETECTION_ERROR",
            DetectError::VideoIdExtractionFailed { .. } => "VIDEO_ID_EXTRACTION_FAILED",
        }
    }

    /// Every kind in this subsystem is a client-side problem with the submitted link.
    pub fn http_status(&self) -> u16 {
        422
    }

    /// The URL the failure refers to
    pub fn url(&self) -> &str {
        match self {
            DetectError::InvalidUrl { url }
            | DetectError::UnsupportedPlatform { url }
            | DetectError::DetectionTimeout { url }
            | DetectError::DetectionError { url, .. }
            | DetectError::VideoIdExtractionFailed { url, .. } => url,
        }
    }

    pub(crate) fn invalid_url(url: &str) -> Self {
        DetectError::InvalidUrl { url: url.to_string() }
    }

    pub(crate) fn unsupported(url: &str) -> Self {
        DetectError::UnsupportedPlatform { url: url.to_string() }
    }
}
