//! Item types shared by every source.
//!
//! - [`Category`]: which report section an item belongs to
//! - [`NormalizedItem`]: a source-agnostic record with a resolved UTC instant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a record has no usable title.
pub const UNTITLED: &str = "(no title)";

/// The report section an item is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Press releases and announcements from RSS/Atom feeds.
    PressRelease,
    /// Hearings and meetings from ICS calendars.
    Event,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 2] = [Category::PressRelease, Category::Event];

    /// Section heading, without the window suffix.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::PressRelease => "Press Releases",
            Self::Event => "Hearings & Meetings",
        }
    }

    /// Leading text of the placeholder shown for an empty section.
    pub fn empty_placeholder(&self) -> &'static str {
        match self {
            Self::PressRelease => "No new items in the last",
            Self::Event => "No events starting in the last",
        }
    }

    /// Stable identifier used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PressRelease => "press_release",
            Self::Event => "event",
        }
    }
}

/// A source-agnostic item ready for filtering and rendering.
///
/// Built once per upstream record that resolved to an instant; never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub category: Category,
    /// Feed title or source URL; never empty.
    pub source_label: String,
    /// Never empty; [`UNTITLED`] when the record had none.
    pub title: String,
    /// May be empty.
    pub link: String,
    /// Resolved instant, always UTC.
    pub timestamp: DateTime<Utc>,
    /// Description text. Only consulted by keyword filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl NormalizedItem {
    /// Creates an item with an empty link and no summary.
    ///
    /// A blank `title` is replaced by [`UNTITLED`], and surrounding whitespace
    /// is trimmed from both `title` and `source_label`.
    pub fn new(
        category: Category,
        source_label: impl Into<String>,
        title: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED);

        Self {
            category,
            source_label: source_label.into().trim().to_string(),
            title: title.to_string(),
            link: String::new(),
            timestamp,
            summary: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into().trim().to_string();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.summary = (!summary.trim().is_empty()).then_some(summary);
        self
    }

    /// Returns true if the item has a non-empty link.
    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    mod category {
        use super::*;

        #[test]
        fn report_order() {
            assert_eq!(Category::ALL, [Category::PressRelease, Category::Event]);
            assert!(Category::PressRelease < Category::Event);
        }

        #[test]
        fn headings() {
            assert_eq!(Category::PressRelease.heading(), "Press Releases");
            assert_eq!(Category::Event.heading(), "Hearings & Meetings");
            assert_eq!(Category::Event.as_str(), "event");
        }

        #[test]
        fn serde_roundtrip() {
            let json = serde_json::to_string(&Category::PressRelease).unwrap();
            assert_eq!(json, r#""press_release""#);
            let parsed: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, Category::PressRelease);
        }
    }

    mod normalized_item {
        use super::*;

        #[test]
        fn blank_title_gets_placeholder() {
            let ts = utc(2024, 3, 15, 10, 0, 0);
            for title in [None, Some(""), Some("  \n ")] {
                let item = NormalizedItem::new(Category::Event, "cal", title, ts);
                assert_eq!(item.title, UNTITLED);
            }
        }

        #[test]
        fn trims_fields() {
            let item = NormalizedItem::new(
                Category::PressRelease,
                "  Governor's Office ",
                Some("  Bill signed  "),
                utc(2024, 3, 15, 10, 0, 0),
            )
            .with_link(" https://example.gov/a ");

            assert_eq!(item.source_label, "Governor's Office");
            assert_eq!(item.title, "Bill signed");
            assert_eq!(item.link, "https://example.gov/a");
            assert!(item.has_link());
        }

        #[test]
        fn defaults() {
            let item = NormalizedItem::new(
                Category::Event,
                "https://example.gov/cal.ics",
                Some("Hearing"),
                utc(2024, 3, 15, 12, 0, 0),
            );
            assert!(!item.has_link());
            assert!(item.summary.is_none());
        }

        #[test]
        fn blank_summary_is_dropped() {
            let ts = utc(2024, 3, 15, 12, 0, 0);
            let item = NormalizedItem::new(Category::Event, "cal", Some("x"), ts).with_summary("  ");
            assert!(item.summary.is_none());

            let item = item.with_summary("Bill H.123 introduced");
            assert_eq!(item.summary.as_deref(), Some("Bill H.123 introduced"));
        }
    }
}
