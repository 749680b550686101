//! RSS/Atom source implementation.

use tracing::{debug, trace};
use url::Url;

use policyfeed_core::NormalizedItem;

use crate::error::SourceResult;
use crate::http::{HttpFetcher, validate_url};
use crate::source::{BoxFuture, Source, SourceKind};

use super::xml::{FeedDocument, parse_feed};

/// A press-release feed.
pub struct RssSource {
    url: String,
    parsed_url: Url,
    fetcher: HttpFetcher,
}

impl RssSource {
    /// Creates a source for `url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is malformed or not http(s).
    pub fn new(url: impl Into<String>, fetcher: HttpFetcher) -> SourceResult<Self> {
        let url = url.into();
        let parsed_url = validate_url(&url)?;
        Ok(Self {
            url,
            parsed_url,
            fetcher,
        })
    }
}

impl Source for RssSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Rss
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn fetch_items(&self) -> BoxFuture<'_, SourceResult<Vec<NormalizedItem>>> {
        Box::pin(async move {
            debug!(url = %self.url, "Fetching feed");
            let body = self.fetcher.get(&self.parsed_url).await?;
            let document = parse_feed(&body).map_err(|e| e.with_url(&self.url))?;
            Ok(feed_items(&document, &self.url))
        })
    }
}

/// Converts feed entries to items, dropping entries without a usable date.
///
/// The source label is the feed title, or `url` when the feed has none.
pub fn feed_items(document: &FeedDocument, url: &str) -> Vec<NormalizedItem> {
    let label = document
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(url);
    let category = SourceKind::Rss.category();

    let items: Vec<_> = document
        .entries
        .iter()
        .filter_map(|entry| {
            let Some(resolved) = entry.resolve_timestamp() else {
                trace!(url, title = ?entry.title, "Dropping entry without a parseable date");
                return None;
            };

            let mut item = NormalizedItem::new(
                category,
                label,
                entry.title.as_deref(),
                resolved.timestamp,
            );
            if let Some(link) = &entry.link {
                item = item.with_link(link.as_str());
            }
            if let Some(summary) = &entry.summary {
                item = item.with_summary(summary.as_str());
            }
            Some(item)
        })
        .collect();

    debug!(
        url,
        count = items.len(),
        dropped = document.entries.len() - items.len(),
        "Parsed feed entries"
    );
    items
}
