//! Configuration commands.

use std::path::Path;

use policyfeed_core::DisplayZone;
use policyfeed_sources::{SourceKind, validate_url};

use crate::config::FeedsConfig;
use crate::error::{AppError, AppResult};

/// Dump the effective configuration, defaults included, to stdout.
pub fn dump(config: &FeedsConfig, path: &Path) -> AppResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# {}", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration and every source URL.
///
/// Loading already rejected unusable values, so this only checks what a run
/// would otherwise report as per-source warnings.
pub fn validate(config: &FeedsConfig) -> AppResult<()> {
    let problems = url_problems(config);
    for problem in &problems {
        println!("{}", problem);
    }

    if matches!(
        DisplayZone::resolve(&config.report.display_timezone),
        DisplayZone::UtcFallback
    ) {
        println!(
            "warning: unknown display timezone '{}', times will be shown in UTC",
            config.report.display_timezone
        );
    }

    if !problems.is_empty() {
        return Err(AppError::Config(format!(
            "{} invalid source URL(s)",
            problems.len()
        )));
    }

    println!(
        "Configuration is valid ({} RSS, {} ICS).",
        config.rss.len(),
        config.ics.len()
    );
    Ok(())
}

fn url_problems(config: &FeedsConfig) -> Vec<String> {
    SourceKind::ALL
        .iter()
        .flat_map(|kind| {
            config
                .urls(*kind)
                .iter()
                .filter_map(move |url| validate_url(url).err().map(|e| format!("{}: {}", kind, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let config = FeedsConfig::parse(
            "rss = [\"https://www.mass.gov/rss/press\"]\nics = [\"http://example.gov/cal.ics\"]\n",
        )
        .unwrap();
        assert!(url_problems(&config).is_empty());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn reports_each_bad_url() {
        let config = FeedsConfig::parse(
            "rss = [\"ftp://example.gov/feed\", \"https://ok.example.gov/rss\"]\nics = [\"nope\"]\n",
        )
        .unwrap();

        let problems = url_problems(&config);
        assert_eq!(problems.len(), 2);
        assert!(problems[0].starts_with("rss: "));
        assert!(problems[0].contains("ftp://example.gov/feed"));
        assert!(problems[1].starts_with("ics: "));
        assert!(matches!(validate(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn dump_serializes_defaults() {
        assert!(dump(&FeedsConfig::default(), Path::new("feeds.toml")).is_ok());
    }
}
