use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub timeout_secs: Option<f64>,
    pub user_agent: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    /// Load config from ~/.config/vidlink/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Short-link timeout, if configured and usable
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.and_then(timeout_from_secs)
    }
}

/// Convert seconds to a timeout; zero, negative, NaN and out-of-range values yield `None`
pub fn timeout_from_secs(secs: f64) -> Option<Duration> {
    if secs <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("vidlink")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
timeout_secs = 2.5
user_agent = "vidlink-test/1.0"
default_format = "json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.user_agent.as_deref(), Some("vidlink-test/1.0"));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.timeout().is_none());
        assert!(config.user_agent.is_none());
        assert!(config.default_format.is_none());
    }

    #[test]
    fn test_out_of_range_timeout_ignored() {
        let config: Config = toml::from_str("timeout_secs = 1e30").unwrap();
        assert!(config.timeout().is_none());
        let config: Config = toml::from_str("timeout_secs = inf").unwrap();
        assert!(config.timeout().is_none());
        let config: Config = toml::from_str("timeout_secs = nan").unwrap();
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_timeout_from_secs() {
        assert_eq!(timeout_from_secs(0.25), Some(Duration::from_millis(250)));
        assert_eq!(timeout_from_secs(0.0), None);
        assert_eq!(timeout_from_secs(f64::MAX), None);
    }

    #[test]
    fn test_non_positive_timeout_ignored() {
        let config: Config = toml::from_str("timeout_secs = 0").unwrap();
        assert!(config.timeout().is_none());
        let config: Config = toml::from_str("timeout_secs = -3.0").unwrap();
        assert!(config.timeout().is_none());
    }
}
