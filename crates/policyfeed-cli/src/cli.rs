//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use policyfeed_core::{SinceSpec, TracingOutputFormat};
use policyfeed_sources::SourceKind;

use crate::config::DEFAULT_FEEDS_PATH;

/// policyfeed - Daily digest of press releases and hearing notices
#[derive(Debug, Parser)]
#[command(name = "policyfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the feeds configuration file
    #[arg(long, env = "POLICYFEED_FEEDS", default_value = DEFAULT_FEEDS_PATH)]
    pub feeds: PathBuf,

    /// Trailing window to report on, e.g. 24h or 7d
    #[arg(long)]
    pub since: Option<SinceSpec>,

    /// Trailing window in whole hours (ignored when --since is given)
    #[arg(long, env = "WINDOW_HOURS", value_parser = clap::value_parser!(u32).range(1..))]
    pub window_hours: Option<u32>,

    /// Directory the dated report is written to
    #[arg(long, default_value = "reports")]
    pub reports_dir: PathBuf,

    /// Only run sources of this kind: rss or ics (can be repeated)
    #[arg(long = "kind", action = clap::ArgAction::Append)]
    pub kinds: Vec<SourceKind>,

    /// Only keep items whose title or summary contains this text (can be repeated)
    #[arg(long = "keyword", action = clap::ArgAction::Append)]
    pub keywords: Vec<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log output format: pretty, compact or json
    #[arg(long, default_value = "compact")]
    pub log_format: TracingOutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The effective window: `--since`, then `--window-hours`, then 24 hours.
    pub fn window(&self) -> SinceSpec {
        self.since
            .or_else(|| self.window_hours.map(SinceSpec::hours))
            .unwrap_or_default()
    }

    /// The source kinds to run, in fetch order. Defaults to all kinds.
    pub fn source_kinds(&self) -> Vec<SourceKind> {
        if self.kinds.is_empty() {
            return SourceKind::ALL.to_vec();
        }
        let mut kinds = self.kinds.clone();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

/// Available commands. Without one, a report is generated.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration, defaults included
    Dump,

    /// Validate the configuration and every source URL
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("policyfeed").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.reports_dir, PathBuf::from("reports"));
        assert_eq!(cli.log_format, TracingOutputFormat::Compact);
        assert!(cli.keywords.is_empty());
        assert!(cli.command.is_none());
        assert_eq!(cli.source_kinds(), [SourceKind::Rss, SourceKind::Ics]);
    }

    #[test]
    fn since_wins_over_window_hours() {
        let cli = parse(&["--since", "7d", "--window-hours", "12"]);
        assert_eq!(cli.window(), SinceSpec::days(7));

        let cli = parse(&["--window-hours", "12"]);
        assert_eq!(cli.window(), SinceSpec::hours(12));
    }

    #[test]
    fn rejects_bad_windows() {
        let base = ["policyfeed"];
        assert!(Cli::try_parse_from(base.iter().chain(&["--since", "3w"])).is_err());
        assert!(Cli::try_parse_from(base.iter().chain(&["--since", "0h"])).is_err());
        assert!(Cli::try_parse_from(base.iter().chain(&["--window-hours", "0"])).is_err());
    }

    #[test]
    fn kinds_are_deduplicated_in_fetch_order() {
        let cli = parse(&["--kind", "ics", "--kind", "rss", "--kind", "ics"]);
        assert_eq!(cli.source_kinds(), [SourceKind::Rss, SourceKind::Ics]);

        let cli = parse(&["--kind", "ics"]);
        assert_eq!(cli.source_kinds(), [SourceKind::Ics]);
    }

    #[test]
    fn repeated_keywords() {
        let cli = parse(&["--keyword", "introduc", "--keyword", "housing"]);
        assert_eq!(cli.keywords, ["introduc", "housing"]);
    }

    #[test]
    fn config_subcommand() {
        let cli = parse(&["--feeds", "other.toml", "config", "dump"]);
        assert_eq!(cli.feeds, PathBuf::from("other.toml"));
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Dump
            })
        ));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
