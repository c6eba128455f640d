//! Built-in platform tables.
//!
//! The domain table, the URL-shape patterns and the short-link hosts are
//! compiled once on first use and never mutated afterwards.

use once_cell::sync::Lazy;
use regex::Regex;

pub const BILIBILI: &str = "bilibili";
pub const YOUTUBE: &str = "youtube";

/// A named URL-shape rule belonging to one platform
#[derive(Debug)]
pub struct PatternDef {
    pub name: &'static str,
    pub regex: Regex,
}

/// All URL-shape rules for one platform, in match order
#[derive(Debug)]
pub struct PlatformPatterns {
    pub platform: &'static str,
    pub patterns: Vec<PatternDef>,
}

/// Read-only lookup tables shared by every classifier tier
#[derive(Debug)]
pub struct PlatformTables {
    /// hostname -> platform, in declaration order
    pub domains: Vec<(&'static str, &'static str)>,
    /// platform -> named patterns, in registration order
    pub patterns: Vec<PlatformPatterns>,
    /// short-link host -> owning platform
    pub short_hosts: Vec<(&'static str, &'static str)>,
}

const BILIBILI_PATTERNS: &[(&str, &str)] = &[
    ("main", r"(https?://)?(www\.)?bilibili\.com/video/[a-zA-Z0-9]+"),
    ("short", r"(https?://)?(b23\.tv|Bili23\.tv)/[a-zA-Z0-9]+"),
    ("av", r"(https?://)?(www\.)?bilibili\.com/video/av\d+"),
    ("live", r"(https?://)?(live\.)?bilibili\.com/\d+"),
    ("bangumi", r"(https?://)?(www\.)?bilibili\.com/bangumi/play/(ss|ep)\d+"),
];

const YOUTUBE_PATTERNS: &[(&str, &str)] = &[
    ("main", r"(https?://)?(www\.)?youtube\.com/watch\?v=[\w\-]+"),
    ("short", r"(https?://)?(youtu\.be/)[\w\-]+"),
    ("shorts", r"(https?://)?(www\.)?youtube\.com/shorts/[\w\-]+"),
    ("playlist", r"(https?://)?(www\.)?youtube\.com/playlist\?list=[\w\-]+"),
    ("channel", r"(https?://)?(www\.)?youtube\.com/(c/|user/|@)[\w\-]+/videos"),
];

const DOMAINS: &[(&str, &str)] = &[
    ("bilibili.com", BILIBILI),
    ("b23.tv", BILIBILI),
    ("bili23.tv", BILIBILI),
    ("live.bilibili.com", BILIBILI),
    ("youtube.com", YOUTUBE),
    ("youtu.be", YOUTUBE),
    ("www.youtube.com", YOUTUBE),
];

const SHORT_HOSTS: &[(&str, &str)] = &[("b23.tv", BILIBILI), ("bili23.tv", BILIBILI)];

static BUILTIN: Lazy<PlatformTables> = Lazy::new(|| {
    PlatformTables {
        domains: DOMAINS.to_vec(),
        patterns: vec![
            compile_platform(BILIBILI, BILIBILI_PATTERNS),
            compile_platform(YOUTUBE, YOUTUBE_PATTERNS),
        ],
        short_hosts: SHORT_HOSTS.to_vec(),
    }
});

/// Compile a platform's rules so they only match from the start of the input.
/// No end anchor: trailing query strings and fragments still match.
fn compile_platform(platform: &'static str, defs: &[(&'static str, &str)]) -> PlatformPatterns {
    let patterns = defs
        .iter()
        .map(|&(name, pattern)| PatternDef {
            name,
            // Built-in patterns are constants; a bad one is a programmer error
            regex: Regex::new(&format!("^(?:{pattern})")).expect("built-in platform pattern must compile"),
        })
        .collect();
    PlatformPatterns { platform, patterns }
}

impl PlatformTables {
    /// The process-wide built-in tables
    pub fn builtin() -> &'static PlatformTables {
        &BUILTIN
    }

    /// Registered platform identifiers, in registration order
    pub fn platform_names(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.platform.to_string()).collect()
    }

    pub fn is_registered(&self, platform: &str) -> bool {
        self.patterns.iter().any(|p| p.platform == platform)
    }

    /// Platform owning a short-link host, if the host is one
    pub fn short_host_platform(&self, host: &str) -> Option<&'static str> {
        self.short_hosts
            .iter()
            .find(|(h, _)| *h == host)
            .map(|(_, platform)| *platform)
    }
}
