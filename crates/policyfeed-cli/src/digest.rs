//! Run driver: fetch every source, filter, render, write.
//!
//! Sources run one at a time in configured order (RSS list, then ICS list).
//! A failing source is logged and contributes no items; it never aborts the
//! run. Only configuration and report-writing errors are fatal.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use policyfeed_core::{
    ItemFilter, KeywordFilter, NormalizedItem, ReportRenderer, SinceSpec, TimeWindow,
};
use policyfeed_sources::{ErrorSource, HttpFetcher, IcsSource, RssSource, Source, SourceKind};

use crate::config::FeedsConfig;
use crate::error::{AppError, AppResult};
use crate::report::write_report;

/// Everything a run needs besides the configuration and the sources.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub window: SinceSpec,
    /// Enabled source kinds; also selects the rendered sections.
    pub kinds: Vec<SourceKind>,
    pub keywords: KeywordFilter,
    pub reports_dir: PathBuf,
    /// Reference instant for the window cutoff.
    pub now: DateTime<Utc>,
    /// Date in the report heading and file name.
    pub report_date: NaiveDate,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub path: PathBuf,
    /// Items that survived filtering and were rendered.
    pub item_count: usize,
    /// URLs of sources that failed, in fetch order.
    pub failed_sources: Vec<String>,
}

/// Items gathered from every source before filtering.
#[derive(Debug, Default)]
pub struct Collected {
    pub items: Vec<NormalizedItem>,
    pub failed: Vec<String>,
}

/// Keywords given on the command line replace the configured list.
pub fn effective_keywords(cli_keywords: &[String], config: &FeedsConfig) -> KeywordFilter {
    if cli_keywords.is_empty() {
        KeywordFilter::new(&config.keywords)
    } else {
        KeywordFilter::new(cli_keywords)
    }
}

/// Builds one source per configured URL of the enabled kinds.
///
/// A URL that cannot be turned into a source becomes an [`ErrorSource`] so
/// its warning is reported in fetch order with the others.
pub fn build_sources(
    config: &FeedsConfig,
    kinds: &[SourceKind],
) -> AppResult<Vec<Box<dyn Source>>> {
    let fetcher = HttpFetcher::new(&config.http_config())
        .map_err(|e| AppError::Config(e.message().to_string()))?;

    let mut sources: Vec<Box<dyn Source>> = Vec::new();
    for kind in kinds {
        for url in config.urls(*kind) {
            let built = match kind {
                SourceKind::Rss => RssSource::new(url.as_str(), fetcher.clone())
                    .map(|s| Box::new(s) as Box<dyn Source>),
                SourceKind::Ics => IcsSource::new(url.as_str(), fetcher.clone())
                    .map(|s| Box::new(s) as Box<dyn Source>),
            };
            sources.push(built.unwrap_or_else(|e| {
                Box::new(ErrorSource::new(*kind, url.as_str(), e)) as Box<dyn Source>
            }));
        }
    }

    debug!(count = sources.len(), "Built sources");
    Ok(sources)
}

/// Fetches every source in order, turning failures into warnings.
pub async fn collect_items(sources: &[Box<dyn Source>]) -> Collected {
    let mut collected = Collected::default();

    for source in sources {
        match source.fetch_items().await {
            Ok(items) => {
                debug!(
                    url = source.url(),
                    kind = %source.kind(),
                    count = items.len(),
                    "Fetched source"
                );
                collected.items.extend(items);
            }
            Err(e) => {
                warn!(
                    url = source.url(),
                    kind = %source.kind(),
                    error = %e,
                    "Skipping source"
                );
                collected.failed.push(source.url().to_string());
            }
        }
    }

    collected
}

/// Runs the whole pipeline and writes the report.
pub async fn run(
    config: &FeedsConfig,
    sources: &[Box<dyn Source>],
    options: &RunOptions,
) -> AppResult<RunOutcome> {
    let collected = collect_items(sources).await;

    let window = TimeWindow::trailing(options.now, options.window);
    let filter = ItemFilter::new(window).with_keywords(options.keywords.clone());
    let items = filter.apply(collected.items);

    let renderer = ReportRenderer::new(config.report_options(&options.kinds));
    let report = renderer.render(&items, options.report_date, &options.window);
    let path = write_report(&options.reports_dir, options.report_date, &report)?;

    info!(
        path = %path.display(),
        count = items.len(),
        failed = collected.failed.len(),
        "Report written"
    );

    Ok(RunOutcome {
        path,
        item_count: items.len(),
        failed_sources: collected.failed,
    })
}
