//! Markdown report rendering.
//!
//! The renderer groups items by [`Category`], sorts each section newest first
//! and prints times in a display timezone. Rendering is a pure function of its
//! inputs, so re-rendering the same items yields byte-identical output.
//!
//! # Example
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use policyfeed_core::format::{ReportOptions, ReportRenderer};
//! use policyfeed_core::{Category, NormalizedItem, SinceSpec};
//!
//! let item = NormalizedItem::new(
//!     Category::PressRelease,
//!     "Governor's Press Office",
//!     Some("Budget filed"),
//!     Utc.with_ymd_and_hms(2025, 2, 5, 15, 0, 0).unwrap(),
//! );
//! let renderer = ReportRenderer::new(ReportOptions::default());
//! let report = renderer.render(
//!     &[item],
//!     NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
//!     &SinceSpec::default(),
//! );
//! assert!(report.contains("- **2025-02-05 10:00** — Budget filed  _Governor's Press Office_"));
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::item::{Category, NormalizedItem};
use crate::time::SinceSpec;

/// Report title used when none is configured.
pub const DEFAULT_REPORT_TITLE: &str = "Massachusetts Policy Feed";

/// Display timezone used when none is configured.
pub const DEFAULT_DISPLAY_TIMEZONE: &str = "America/New_York";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The timezone item times are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// A zone from the IANA database.
    Named(Tz),
    /// The configured zone could not be resolved; times are shown in UTC
    /// with an explicit ` UTC` suffix.
    UtcFallback,
}

impl DisplayZone {
    /// Resolves an IANA zone name, falling back to UTC with a warning.
    pub fn resolve(name: &str) -> Self {
        match name.trim().parse::<Tz>() {
            Ok(tz) => Self::Named(tz),
            Err(e) => {
                warn!(zone = name, error = %e, "Unknown display timezone, rendering times in UTC");
                Self::UtcFallback
            }
        }
    }

    /// Formats an instant for an item line.
    pub fn format(&self, timestamp: DateTime<Utc>) -> String {
        match self {
            Self::Named(tz) => timestamp.with_timezone(tz).format(TIME_FORMAT).to_string(),
            Self::UtcFallback => format!("{} UTC", timestamp.format(TIME_FORMAT)),
        }
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::Named(chrono_tz::America::New_York)
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::UtcFallback => f.write_str("UTC (fallback)"),
        }
    }
}

/// Configuration options for report rendering.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Title on the first line, before the report date.
    pub title: String,
    pub display_zone: DisplayZone,
    /// Sections to render. Order is irrelevant; sections always appear in
    /// [`Category::ALL`] order.
    pub categories: Vec<Category>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
            display_zone: DisplayZone::default(),
            categories: Category::ALL.to_vec(),
        }
    }
}

impl ReportOptions {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_display_zone(mut self, zone: DisplayZone) -> Self {
        self.display_zone = zone;
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    fn renders(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Renders filtered items into a Markdown digest.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    options: ReportOptions,
}

impl ReportRenderer {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Renders the full report.
    ///
    /// Items are expected to be filtered already; categories that are not
    /// enabled in the options are skipped along with their items.
    pub fn render(
        &self,
        items: &[NormalizedItem],
        report_date: NaiveDate,
        window: &SinceSpec,
    ) -> String {
        let window_text = window.describe();
        let mut lines = vec![
            format!(
                "# {} — {}",
                clean_text(&self.options.title),
                report_date.format("%Y-%m-%d")
            ),
            String::new(),
        ];

        for category in Category::ALL {
            if !self.options.renders(category) {
                continue;
            }

            lines.push(format!("## {} (last {})", category.heading(), window_text));
            lines.push(String::new());

            let section = sorted_section(items, category);
            if section.is_empty() {
                lines.push(format!(
                    "> {} {}.",
                    category.empty_placeholder(),
                    window_text
                ));
            } else {
                lines.extend(section.into_iter().map(|item| self.format_item(item)));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    /// Formats one bullet line.
    pub fn format_item(&self, item: &NormalizedItem) -> String {
        let time = self.options.display_zone.format(item.timestamp);
        let title = clean_text(&item.title);
        let source = clean_text(&item.source_label);

        if item.has_link() {
            format!("- **{}** — {}  _{}_", time, markdown_link(&title, &item.link), source)
        } else {
            format!("- **{}** — {}  _{}_", time, title, source)
        }
    }
}

/// Items of one category, newest first. Ties keep input order.
fn sorted_section(items: &[NormalizedItem], category: Category) -> Vec<&NormalizedItem> {
    let mut section: Vec<_> = items.iter().filter(|i| i.category == category).collect();
    section.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    section
}

/// Collapses runs of whitespace and control characters into single spaces
/// and trims the result.
pub fn clean_text(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Creates an inline Markdown link.
pub fn markdown_link(label: &str, url: &str) -> String {
    format!("[{}]({})", label, url.trim())
}
