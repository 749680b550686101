//! Timestamp resolution for heterogeneous upstream records.
//!
//! Feeds and calendars populate their date fields inconsistently. A record is
//! resolved by walking a [`FallbackChain`] of extraction attempts in priority
//! order and taking the first one that produces an instant. Every attempt
//! yields a UTC instant; values without an explicit zone are read as UTC.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use tracing::trace;

/// Formats carrying a numeric UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M %z",
];

/// Formats without any zone designator; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
];

/// `2024-03-15`, optionally followed by `T10:30` or ` 10:30:45`.
static ISO_COMPONENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?")
        .expect("Invalid ISO components regex")
});

/// `15 Mar 2024`, optionally followed by ` 10:30` or ` 10:30:45`.
static TEXTUAL_COMPONENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2})\s+([A-Za-z]{3})[A-Za-z]*\.?,?\s+(\d{4})(?:,?\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?",
    )
    .expect("Invalid textual components regex")
});

/// Parses a free-text timestamp as published by feeds.
///
/// Accepts RFC 3339, RFC 2822 (including obsolete zone names such as `EST`),
/// ISO-8601 with a numeric offset, zone-less ISO-8601 and RFC-2822-shaped
/// text, and bare `YYYY-MM-DD` dates. Zone-less values are read as UTC and
/// bare dates resolve to midnight UTC. A leading weekday that disagrees with
/// the date is ignored. Returns `None` on any failure.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .or_else(|| strip_weekday(text).and_then(parse_timestamp))
}

/// `Mon, 15 Mar 2024 ...` without the `Mon, ` prefix.
///
/// chrono rejects a weekday that does not match the date, which would leave
/// only the zone-less scraped components for such entries.
fn strip_weekday(text: &str) -> Option<&str> {
    let (weekday, rest) = text.split_once(',')?;
    let weekday = weekday.trim();
    (weekday.len() >= 3 && weekday.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| rest.trim_start())
}

/// Leniently scrapes calendar components out of a date string.
///
/// This is the structured fallback for text that [`parse_timestamp`] rejects,
/// e.g. a valid date followed by an unknown zone abbreviation or prose. Any
/// zone designator is ignored; the caller interprets the result as UTC.
pub fn scrape_components(text: &str) -> Option<NaiveDateTime> {
    if let Some(caps) = ISO_COMPONENTS.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return components_to_naive(year, month, day, &caps, 4);
    }

    let caps = TEXTUAL_COMPONENTS.captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = month_from_abbrev(&caps[2])?;
    let year = caps[3].parse().ok()?;
    components_to_naive(year, month, day, &caps, 4)
}

fn components_to_naive(
    year: i32,
    month: u32,
    day: u32,
    caps: &regex::Captures<'_>,
    first_time_group: usize,
) -> Option<NaiveDateTime> {
    let field = |offset: usize| -> Option<u32> {
        caps.get(first_time_group + offset)
            .and_then(|m| m.as_str().parse().ok())
    };
    let hour = field(0).unwrap_or(0);
    let minute = field(1).unwrap_or(0);
    let second = field(2).unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    let month = match abbrev.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Name of the field that produced the instant.
    pub field: &'static str,
    /// The resolved instant.
    pub timestamp: DateTime<Utc>,
}

struct Attempt<'a> {
    field: &'static str,
    extract: Box<dyn Fn() -> Option<DateTime<Utc>> + 'a>,
}

/// An ordered list of timestamp extraction attempts.
///
/// Attempts run lazily in insertion order and the chain stops at the first
/// success. A field that is absent or fails to parse counts as a miss.
///
/// ```rust
/// use policyfeed_core::resolve::FallbackChain;
///
/// let resolved = FallbackChain::new()
///     .text("published", Some("not a date"))
///     .text("updated", Some("2024-03-15T10:00:00Z"))
///     .resolve()
///     .unwrap();
/// assert_eq!(resolved.field, "updated");
/// ```
#[derive(Default)]
pub struct FallbackChain<'a> {
    attempts: Vec<Attempt<'a>>,
}

impl<'a> FallbackChain<'a> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a free-text field, parsed with [`parse_timestamp`].
    pub fn text(mut self, field: &'static str, value: Option<&'a str>) -> Self {
        self.attempts.push(Attempt {
            field,
            extract: Box::new(move || value.and_then(parse_timestamp)),
        });
        self
    }

    /// Appends zone-less calendar components, interpreted as UTC.
    pub fn naive(mut self, field: &'static str, value: Option<NaiveDateTime>) -> Self {
        self.attempts.push(Attempt {
            field,
            extract: Box::new(move || value.map(|naive| naive.and_utc())),
        });
        self
    }

    /// Appends an instant that was already resolved upstream.
    pub fn instant(mut self, field: &'static str, value: Option<DateTime<Utc>>) -> Self {
        self.attempts.push(Attempt {
            field,
            extract: Box::new(move || value),
        });
        self
    }

    /// Appends an arbitrary extraction closure.
    pub fn attempt<F>(mut self, field: &'static str, extract: F) -> Self
    where
        F: Fn() -> Option<DateTime<Utc>> + 'a,
    {
        self.attempts.push(Attempt {
            field,
            extract: Box::new(extract),
        });
        self
    }

    /// Runs the chain, returning the first successful attempt.
    pub fn resolve(&self) -> Option<Resolved> {
        for attempt in &self.attempts {
            if let Some(timestamp) = (attempt.extract)() {
                trace!(field = attempt.field, %timestamp, "Resolved timestamp");
                return Some(Resolved {
                    field: attempt.field,
                    timestamp,
                });
            }
            trace!(field = attempt.field, "Timestamp field missing or unparseable");
        }
        None
    }

    /// Returns the number of attempts in the chain.
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Returns true if the chain has no attempts.
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

impl fmt::Debug for FallbackChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.attempts.iter().map(|a| a.field))
            .finish()
    }
}
