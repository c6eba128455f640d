//! Platform-native video ID extraction.
//!
//! Each platform contributes one strategy function; the extractor picks the
//! strategy by platform name and runs its rules in order.

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::detector::DEFAULT_TIMEOUT;
use crate::error::{DetectError, Result};
use crate::normalize::parse_absolute;
use crate::platforms::{BILIBILI, PlatformTables, YOUTUBE};
use crate::resolve::ShortLinkResolver;
use crate::DetectionResult;

static BV_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"BV([0-9A-Za-z]+)").unwrap());
static AV_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"av(\d+)").unwrap());
static VIDEO_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/video/([a-zA-Z0-9]+)").unwrap());

static YOUTUBE_IDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[?&]v=([0-9A-Za-z_-]{11})",
        r"youtu\.be/([0-9A-Za-z_-]{11})",
        r"/shorts/([0-9A-Za-z_-]{11})",
        r"/embed/([0-9A-Za-z_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[(BILIBILI, bilibili_id), (YOUTUBE, youtube_id)];

/// What to extract an ID from
#[derive(Debug, Clone, Copy)]
pub enum VideoSource<'a> {
    Url(&'a str),
    Detected(&'a DetectionResult),
}

impl<'a> From<&'a str> for VideoSource<'a> {
    fn from(url: &'a str) -> Self {
        VideoSource::Url(url)
    }
}

impl<'a> From<&'a String> for VideoSource<'a> {
    fn from(url: &'a String) -> Self {
        VideoSource::Url(url)
    }
}

impl<'a> From<&'a DetectionResult> for VideoSource<'a> {
    fn from(result: &'a DetectionResult) -> Self {
        VideoSource::Detected(result)
    }
}

#[derive(Debug, Clone)]
pub struct VideoIdExtractor {
    tables: &'static PlatformTables,
    resolver: ShortLinkResolver,
    timeout: Duration,
}

impl Default for VideoIdExtractor {
    fn default() -> Self {
        Self::new(ShortLinkResolver::new())
    }
}

impl VideoIdExtractor {
    pub fn new(resolver: ShortLinkResolver) -> Self {
        Self {
            tables: PlatformTables::builtin(),
            resolver,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use different platform tables for the short-host check
    pub fn tables(mut self, tables: &'static PlatformTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract the video ID.
    ///
    /// A detection result supplies its own URL and platform and `platform` is
    /// ignored. A bare URL needs `platform`, otherwise it is rejected as
    /// `InvalidUrl`.
    pub async fn extract_video_id<'a>(
        &self,
        source: impl Into<VideoSource<'a>>,
        platform: Option<&str>,
    ) -> Result<String> {
        let (url, platform) = match source.into() {
            VideoSource::Detected(result) => {
                let url = if result.normalized_url.is_empty() {
                    result.original_url.as_str()
                } else {
                    result.normalized_url.as_str()
                };
                (url, result.platform.as_str())
            }
            VideoSource::Url(url) => match platform {
                Some(platform) => (url, platform),
                None => return Err(DetectError::invalid_url(url)),
            },
        };

        if parse_absolute(url).is_none() {
            return Err(DetectError::invalid_url(url));
        }

        let strategy = STRATEGIES
            .iter()
            .find(|(name, _)| *name == platform)
            .map(|(_, strategy)| *strategy)
            .ok_or_else(|| DetectError::unsupported(url))?;

        let resolved = if ShortLinkResolver::handles(self.tables, url) {
            self.resolver.follow_redirects(url, self.timeout).await
        } else {
            None
        };
        let target = resolved.as_deref().unwrap_or(url);

        match strategy(target) {
            Some(id) => {
                debug!("Extracted {platform} video ID {id} from {target}");
                Ok(id)
            }
            None => Err(DetectError::VideoIdExtractionFailed {
                url: target.to_string(),
                platform: platform.to_string(),
            }),
        }
    }
}

fn bilibili_id(url: &str) -> Option<String> {
    if let Some(caps) = BV_ID.captures(url) {
        return Some(format!("BV{}", &caps[1]));
    }
    if let Some(caps) = AV_ID.captures(url) {
        return Some(format!("av{}", &caps[1]));
    }
    VIDEO_PATH.captures(url).map(|caps| caps[1].to_string())
}

fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_IDS
        .iter()
        .find_map(|re| re.captures(url).map(|caps| caps[1].to_string()))
}
