//! Feeds configuration.
//!
//! A single TOML file, `feeds.toml` in the working directory by default:
//!
//! ```toml
//! rss = ["https://www.mass.gov/rss/press"]
//! ics = ["https://malegislature.gov/Events/hearings.ics"]
//! keywords = ["introduc"]
//!
//! [report]
//! title = "Massachusetts Policy Feed"
//! display_timezone = "America/New_York"
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! Every key is optional. A missing or malformed file is a fatal error.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use policyfeed_core::{
    Category, DEFAULT_DISPLAY_TIMEZONE, DEFAULT_REPORT_TITLE, DisplayZone, ReportOptions,
};
use policyfeed_sources::{HttpConfig, SourceKind, default_user_agent};

use crate::error::{AppError, AppResult};

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_FEEDS_PATH: &str = "feeds.toml";

/// The parsed feeds file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    /// RSS/Atom feed URLs, fetched in order.
    pub rss: Vec<String>,

    /// ICS calendar URLs, fetched in order after the feeds.
    pub ics: Vec<String>,

    /// Keyword filter; empty disables it.
    pub keywords: Vec<String>,

    pub report: ReportSettings,

    pub http: HttpSettings,
}

/// Report presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,

    /// IANA zone name used for displayed times.
    pub display_timezone: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            display_timezone: DEFAULT_DISPLAY_TIMEZONE.to_string(),
        }
    }
}

/// HTTP settings shared by every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Whole-request timeout per source, in seconds.
    pub timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: HttpConfig::DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl FeedsConfig {
    /// Loads and validates the configuration at `path`.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML content without validating it.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> AppResult<()> {
        if self.http.timeout_secs == 0 {
            return Err(AppError::Config(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.report.title.trim().is_empty() {
            return Err(AppError::Config("report.title must not be empty".to_string()));
        }
        Ok(())
    }

    /// The configured URLs for one source kind.
    pub fn urls(&self, kind: SourceKind) -> &[String] {
        match kind {
            SourceKind::Rss => &self.rss,
            SourceKind::Ics => &self.ics,
        }
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::default()
            .with_timeout(Duration::from_secs(self.http.timeout_secs))
            .with_user_agent(
                self.http
                    .user_agent
                    .clone()
                    .unwrap_or_else(default_user_agent),
            )
    }

    /// Renderer options for a run over `kinds`.
    pub fn report_options(&self, kinds: &[SourceKind]) -> ReportOptions {
        ReportOptions::default()
            .with_title(self.report.title.trim())
            .with_display_zone(DisplayZone::resolve(&self.report.display_timezone))
            .with_categories(kinds.iter().map(SourceKind::category).collect::<Vec<Category>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_file() {
        let content = r#"
rss = ["https://www.mass.gov/rss/press", "https://malegislature.gov/rss"]
ics = ["https://malegislature.gov/Events/hearings.ics"]
keywords = ["introduc"]

[report]
title = "Weekly Digest"
display_timezone = "America/Chicago"

[http]
timeout_secs = 10
user_agent = "policyfeed-test"
"#;
        let config = FeedsConfig::parse(content).unwrap();
        assert_eq!(config.rss.len(), 2);
        assert_eq!(config.urls(SourceKind::Ics), ["https://malegislature.gov/Events/hearings.ics"]);
        assert_eq!(config.keywords, ["introduc"]);
        assert_eq!(config.report.title, "Weekly Digest");

        let http = config.http_config();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.user_agent, "policyfeed-test");
    }

    #[test]
    fn missing_keys_default() {
        let config = FeedsConfig::parse("").unwrap();
        assert_eq!(config, FeedsConfig::default());
        assert!(config.rss.is_empty());
        assert!(config.ics.is_empty());
        assert_eq!(config.report.title, "Massachusetts Policy Feed");
        assert_eq!(config.report.display_timezone, "America/New_York");
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http_config().user_agent.starts_with("policyfeed/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn only_rss() {
        let config = FeedsConfig::parse("rss = [\"https://example.gov/rss\"]\n").unwrap();
        assert_eq!(config.rss.len(), 1);
        assert!(config.ics.is_empty());
    }

    #[test]
    fn malformed_is_error() {
        assert!(FeedsConfig::parse("rss = [").is_err());
        assert!(FeedsConfig::parse("rss = \"not a list\"").is_err());
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let config = FeedsConfig::parse("[http]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FeedsConfig::load_from(&dir.path().join("feeds.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeds.toml");
        std::fs::write(&path, "ics = [\"https://example.gov/cal.ics\"]\n").unwrap();

        let config = FeedsConfig::load_from(&path).unwrap();
        assert_eq!(config.ics, ["https://example.gov/cal.ics"]);
    }

    #[test]
    fn report_options_follow_kinds() {
        let config = FeedsConfig::default();
        let options = config.report_options(&[SourceKind::Ics]);
        assert_eq!(options.categories, [Category::Event]);
        assert_eq!(options.title, "Massachusetts Policy Feed");

        let mut config = FeedsConfig::default();
        config.report.display_timezone = "Nowhere/Special".to_string();
        let options = config.report_options(&SourceKind::ALL);
        assert_eq!(options.display_zone, DisplayZone::UtcFallback);
    }
}
