//! policyfeed CLI entry point.

use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::Parser;

use policyfeed_cli::cli::{Cli, Command, ConfigAction};
use policyfeed_cli::commands;
use policyfeed_cli::config::FeedsConfig;
use policyfeed_cli::digest::{self, RunOptions};
use policyfeed_cli::error::{AppError, AppResult};
use policyfeed_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::cli(cli.debug).with_format(cli.log_format)) {
        eprintln!("error: {}", AppError::from(e));
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = FeedsConfig::load_from(&cli.feeds)?;

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &cli.feeds),
            ConfigAction::Validate => commands::config::validate(&config),
        },
        None => {
            let kinds = cli.source_kinds();
            let options = RunOptions {
                window: cli.window(),
                keywords: digest::effective_keywords(&cli.keywords, &config),
                reports_dir: cli.reports_dir.clone(),
                now: Utc::now(),
                report_date: Local::now().date_naive(),
                kinds,
            };

            let sources = digest::build_sources(&config, &options.kinds)?;
            let outcome = digest::run(&config, &sources, &options).await?;

            println!(
                "Wrote {} with {} items.",
                outcome.path.display(),
                outcome.item_count
            );
            Ok(())
        }
    }
}
