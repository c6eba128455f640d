use std::time::Duration;

use log::debug;
use url::Url;

use crate::domain::classify_by_domain;
use crate::normalize::host_of;
use crate::platforms::PlatformTables;
use crate::{DetectionMethod, DetectionResult};

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Follows redirects for known short-link hosts.
///
/// Resolution is best effort: every request failure is logged and reported
/// as "no result".
#[derive(Debug, Clone)]
pub struct ShortLinkResolver {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for ShortLinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortLinkResolver {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether `url` points at a short-link host this resolver may contact
    pub fn handles(tables: &PlatformTables, url: &str) -> bool {
        host_of(url).is_some_and(|host| tables.short_host_platform(&host).is_some())
    }

    /// Issue a HEAD request and return the final URL if at least one redirect happened
    pub async fn follow_redirects(&self, url: &str, timeout: Duration) -> Option<String> {
        let requested = Url::parse(url).ok()?;

        let resp = match self
            .client
            .head(requested.clone())
            .header("User-Agent", &self.user_agent)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                debug!("Short link request failed for {url}: {e}");
                return None;
            }
        };

        if resp.url() == &requested {
            debug!("No redirect for {url} (status {})", resp.status());
            return None;
        }

        let resolved = resp.url().to_string();
        debug!("Resolved {url} -> {resolved}");
        Some(resolved)
    }

    /// Resolve a short link and classify the redirect target by domain.
    ///
    /// Hosts that are not short-link hosts are ignored without any I/O.
    pub async fn resolve(&self, tables: &PlatformTables, url: &str, timeout: Duration) -> Option<DetectionResult> {
        if !Self::handles(tables, url) {
            return None;
        }
        let short_host = host_of(url)?;

        let resolved = self.follow_redirects(url, timeout).await?;
        let mut result = classify_by_domain(tables, &resolved)?
            .with_info("detection_method", DetectionMethod::HttpRedirect.as_str())
            .with_info("original_domain", &short_host);
        result.original_url = url.to_string();
        result.normalized_url = resolved;
        Some(result)
    }
}
