//! Item filtering: the trailing time window and the optional keyword filter.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::item::NormalizedItem;
use crate::time::TimeWindow;

/// Case-insensitive substring filter over item title and summary.
///
/// An empty keyword list disables the filter and every item passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Builds a filter from raw keywords. Blank entries are ignored.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Returns true if at least one keyword is configured.
    pub fn is_enabled(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// The normalized (lowercased) keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Checks an item against the keywords. Any match retains.
    pub fn matches(&self, item: &NormalizedItem) -> bool {
        if !self.is_enabled() {
            return true;
        }

        let title = item.title.to_lowercase();
        let summary = item
            .summary
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.keywords
            .iter()
            .any(|k| title.contains(k.as_str()) || summary.contains(k.as_str()))
    }
}

/// The filters applied between fetching and rendering.
#[derive(Debug, Clone)]
pub struct ItemFilter {
    pub window: TimeWindow,
    pub keywords: KeywordFilter,
}

impl ItemFilter {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            keywords: KeywordFilter::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordFilter) -> Self {
        self.keywords = keywords;
        self
    }

    /// Checks whether a single item survives every filter.
    pub fn keeps(&self, item: &NormalizedItem) -> bool {
        self.window.contains(item.timestamp) && self.keywords.matches(item)
    }

    /// Retains the items that survive every filter, preserving order.
    pub fn apply(&self, mut items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
        let before = items.len();

        items.retain(|item| self.window.contains(item.timestamp));
        let in_window = items.len();

        if self.keywords.is_enabled() {
            items.retain(|item| self.keywords.matches(item));
        }

        debug!(
            total = before,
            in_window,
            kept = items.len(),
            cutoff = %self.window.cutoff,
            "Filtered items"
        );
        items
    }
}
