use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

use crate::domain::classify_by_domain;
use crate::error::{DetectError, Result};
use crate::normalize::normalize_url;
use crate::pattern::classify_by_pattern;
use crate::platforms::PlatformTables;
use crate::resolve::ShortLinkResolver;
use crate::DetectionResult;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Slack added on top of the request timeout before the short-link tier is abandoned
pub const DEADLINE_GRACE: Duration = Duration::from_secs(1);

/// Runs the detection tiers in order: domain, pattern, short link.
///
/// Holds only read-only tables and a shareable HTTP client, so one instance
/// can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct PlatformDetector {
    tables: &'static PlatformTables,
    resolver: ShortLinkResolver,
    timeout: Duration,
    deadline_grace: Duration,
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformDetector {
    pub fn new() -> Self {
        Self::with_resolver(ShortLinkResolver::new())
    }

    pub fn with_resolver(resolver: ShortLinkResolver) -> Self {
        Self {
            tables: PlatformTables::builtin(),
            resolver,
            timeout: DEFAULT_TIMEOUT,
            deadline_grace: DEADLINE_GRACE,
        }
    }

    /// Use different platform tables (mainly for tests and embedding)
    pub fn tables(mut self, tables: &'static PlatformTables) -> Self {
        self.tables = tables;
        self
    }

    /// Default short-link timeout when a call does not supply one
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Slack allowed past the request timeout before the short-link tier times out
    pub fn deadline_grace(mut self, grace: Duration) -> Self {
        self.deadline_grace = grace;
        self
    }

    pub fn resolver(&self) -> &ShortLinkResolver {
        &self.resolver
    }

    /// Identify the platform of `url`.
    ///
    /// Fails with `InvalidUrl` when the input cannot be made into an absolute
    /// URL, `UnsupportedPlatform` when no tier recognizes it, and
    /// `DetectionTimeout` when short-link resolution overruns its deadline.
    pub async fn detect_platform(&self, url: &str, timeout: Option<Duration>) -> Result<DetectionResult> {
        let (normalized, valid) = normalize_url(url);
        if !valid {
            debug!("Rejecting invalid URL: {url:?}");
            return Err(DetectError::invalid_url(url));
        }

        if let Some(result) = classify_by_domain(self.tables, &normalized) {
            return Ok(result);
        }

        if let Some(result) = classify_by_pattern(self.tables, &normalized) {
            return Ok(result);
        }

        let timeout = timeout.unwrap_or(self.timeout);
        if let Some(result) = self.short_link_tier(&normalized, timeout).await? {
            return Ok(result);
        }

        debug!("No tier recognized {normalized}");
        Err(DetectError::unsupported(url))
    }

    async fn short_link_tier(&self, url: &str, timeout: Duration) -> Result<Option<DetectionResult>> {
        if !ShortLinkResolver::handles(self.tables, url) {
            return Ok(None);
        }

        let resolver = self.resolver.clone();
        let tables = self.tables;
        let target = url.to_string();
        let mut task = tokio::spawn(async move { resolver.resolve(tables, &target, timeout).await });

        let outcome = tokio::time::timeout(timeout.saturating_add(self.deadline_grace), &mut task).await;
        if outcome.is_err() {
            task.abort();
        }
        settle(url, outcome)
    }

    /// `true` if `url` is recognized; invalid and unsupported links are `false`
    pub async fn is_supported_url(&self, url: &str) -> bool {
        match self.detect_platform(url, None).await {
            Ok(_) => true,
            Err(DetectError::InvalidUrl { .. } | DetectError::UnsupportedPlatform { .. }) => false,
            Err(e) => {
                warn!("Detection failed while checking support for {url}: {e}");
                false
            }
        }
    }

    /// Registered platform identifiers, in registration order
    pub fn supported_platforms(&self) -> Vec<String> {
        self.tables.platform_names()
    }
}

/// Translate the outcome of the spawned short-link task
fn settle(
    url: &str,
    outcome: std::result::Result<std::result::Result<Option<DetectionResult>, JoinError>, Elapsed>,
) -> Result<Option<DetectionResult>> {
    match outcome {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(DetectError::DetectionError {
            url: url.to_string(),
            message: e.to_string(),
        }),
        Err(_) => {
            warn!("Short link resolution timed out for {url}");
            Err(DetectError::DetectionTimeout { url: url.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::BILIBILI;

    const BV_URL: &str = "https://www.bilibili.com/video/BV1xx411c7mT";

    fn detector() -> PlatformDetector {
        PlatformDetector::new()
    }

    #[tokio::test]
    async fn test_bilibili_main_format() {
        let urls = [
            BV_URL,
            "https://bilibili.com/video/BV1xx411c7mT",
            "https://www.bilibili.com/video/BV1xx411c7mT?p=1",
            "www.bilibili.com/video/BV1xx411c7mT",
        ];
        for url in urls {
            let r = detector().detect_platform(url, None).await.unwrap();
            assert_eq!(r.platform, "bilibili", "{url}");
            assert!(r.confidence >= 0.9);
            assert!(r.detection_method().starts_with("domain"));
        }
    }

    #[tokio::test]
    async fn test_youtube_main_format() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        ];
        for url in urls {
            let r = detector().detect_platform(url, None).await.unwrap();
            assert_eq!(r.platform, "youtube", "{url}");
            assert!(r.confidence >= 0.9);
        }
    }

    #[tokio::test]
    async fn test_scheme_is_prepended() {
        let r = detector()
            .detect_platform("www.bilibili.com/video/BV1xx411c7mT", None)
            .await
            .unwrap();
        assert_eq!(r.original_url, BV_URL);
        assert_eq!(r.normalized_url, BV_URL);
    }

    #[tokio::test]
    async fn test_uppercase_host() {
        let r = detector()
            .detect_platform("https://WWW.BILIBILI.COM/video/BV1xx411c7mT", None)
            .await
            .unwrap();
        assert_eq!(r.platform, "bilibili");
    }

    #[tokio::test]
    async fn test_unsupported_url() {
        for url in ["https://vimeo.com/123456", "https://www.example.com/video/123"] {
            let err = detector().detect_platform(url, None).await.unwrap_err();
            assert_eq!(err, DetectError::UnsupportedPlatform { url: url.to_string() });
        }
    }

    #[tokio::test]
    async fn test_invalid_url() {
        for url in ["", "   ", "not a url"] {
            let err = detector().detect_platform(url, None).await.unwrap_err();
            assert!(matches!(err, DetectError::InvalidUrl { .. }), "{url:?}: {err}");
        }
    }

    #[tokio::test]
    async fn test_idempotent() {
        let d = detector();
        let first = d.detect_platform(BV_URL, None).await.unwrap();
        let second = d.detect_platform(BV_URL, None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_callers() {
        let d = detector();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let d = d.clone();
                tokio::spawn(async move { d.detect_platform("https://youtu.be/dQw4w9WgXcQ", None).await })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap().platform, "youtube");
        }
    }

    #[tokio::test]
    async fn test_is_supported_url() {
        let d = detector();
        assert!(d.is_supported_url(BV_URL).await);
        assert!(d.is_supported_url("https://youtu.be/dQw4w9WgXcQ").await);
        assert!(!d.is_supported_url("https://vimeo.com/123").await);
        assert!(!d.is_supported_url("").await);
    }

    #[test]
    fn test_supported_platforms() {
        assert_eq!(detector().supported_platforms(), vec!["bilibili", "youtube"]);
    }

    #[tokio::test]
    async fn test_short_link_resolution() {
        let mut server = mockito::Server::new_async().await;
        let port = server.host_with_port().rsplit(':').next().unwrap().to_string();
        let target = format!("http://localhost:{port}/video/BV1xx411c7mT");
        let _short = server
            .mock("HEAD", "/abc123")
            .with_status(302)
            .with_header("location", &target)
            .create_async()
            .await;
        let _video = server.mock("HEAD", "/video/BV1xx411c7mT").with_status(200).create_async().await;

        // 127.0.0.1 plays the short host, localhost the canonical domain
        let tables: &'static PlatformTables = Box::leak(Box::new(PlatformTables {
            domains: vec![("localhost", BILIBILI)],
            patterns: vec![],
            short_hosts: vec![("127.0.0.1", BILIBILI)],
        }));
        let input = format!("{}/abc123", server.url());

        let r = detector().tables(tables).detect_platform(&input, None).await.unwrap();
        assert_eq!(r.platform, "bilibili");
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.detection_method(), "http_redirect");
        assert_eq!(r.extra_info.get("original_domain").map(String::as_str), Some("127.0.0.1"));
        assert_eq!(r.original_url, input);
        assert_eq!(r.normalized_url, target);
    }

    #[tokio::test]
    async fn test_unresolvable_short_link_is_unsupported() {
        let tables: &'static PlatformTables = Box::leak(Box::new(PlatformTables {
            domains: vec![],
            patterns: vec![],
            short_hosts: vec![("127.0.0.1", BILIBILI)],
        }));
        let err = detector()
            .tables(tables)
            .detect_platform("http://127.0.0.1:1/abc", Some(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DetectError::UnsupportedPlatform { .. }));
    }

    #[tokio::test]
    async fn test_huge_timeout_does_not_overflow_deadline() {
        let tables: &'static PlatformTables = Box::leak(Box::new(PlatformTables {
            domains: vec![],
            patterns: vec![],
            short_hosts: vec![("127.0.0.1", BILIBILI)],
        }));
        let err = detector()
            .tables(tables)
            .detect_platform("http://127.0.0.1:1/abc", Some(Duration::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, DetectError::UnsupportedPlatform { .. }));
    }

    #[tokio::test]
    async fn test_short_link_deadline_exceeded() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // accept connections and never answer
        let hold = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });

        let tables: &'static PlatformTables = Box::leak(Box::new(PlatformTables {
            domains: vec![],
            patterns: vec![],
            short_hosts: vec![("127.0.0.1", BILIBILI)],
        }));
        let input = format!("http://{addr}/abc");
        let err = detector()
            .tables(tables)
            .deadline_grace(Duration::ZERO)
            .detect_platform(&input, Some(Duration::from_millis(300)))
            .await
            .unwrap_err();
        assert_eq!(err, DetectError::DetectionTimeout { url: input });
        assert_eq!(err.code(), 300203);

        hold.abort();
    }

    #[tokio::test]
    async fn test_settle_timeout() {
        let elapsed = tokio::time::timeout(Duration::ZERO, std::future::pending::<()>())
            .await
            .unwrap_err();
        let err = settle("https://b23.tv/abc", Err(elapsed)).unwrap_err();
        assert_eq!(err, DetectError::DetectionTimeout { url: "https://b23.tv/abc".to_string() });
    }

    #[tokio::test]
    async fn test_settle_join_error() {
        let join_err = tokio::spawn(async { Option::<DetectionResult>::None.expect("resolver blew up") })
            .await
            .unwrap_err();
        let err = settle("https://b23.tv/abc", Ok(Err(join_err))).unwrap_err();
        match err {
            DetectError::DetectionError { url, message } => {
                assert_eq!(url, "https://b23.tv/abc");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
