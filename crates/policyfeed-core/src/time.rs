//! Time window types for report recency.
//!
//! This module provides [`SinceSpec`], the compact `"24h"` / `"7d"` window
//! notation accepted on the command line, and [`TimeWindow`], the trailing
//! window anchored at a reference instant that decides which items are kept.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

/// Unit of a [`SinceSpec`] magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowUnit {
    /// Whole hours (`h`).
    Hours,
    /// Whole days (`d`).
    Days,
}

impl WindowUnit {
    /// Returns the single-letter suffix used in the compact notation.
    pub fn suffix(&self) -> char {
        match self {
            Self::Hours => 'h',
            Self::Days => 'd',
        }
    }

    fn noun(&self, magnitude: u32) -> &'static str {
        match (self, magnitude) {
            (Self::Hours, 1) => "hour",
            (Self::Hours, _) => "hours",
            (Self::Days, 1) => "day",
            (Self::Days, _) => "days",
        }
    }
}

/// Errors produced when parsing a [`SinceSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinceSpecError {
    /// The input was empty or only whitespace.
    #[error("window spec is empty")]
    Empty,

    /// The trailing unit is not one of `h` or `d`.
    #[error("unknown window unit '{0}' (expected 'h' or 'd')")]
    UnknownUnit(char),

    /// The magnitude is not a positive integer.
    #[error("invalid window magnitude '{0}' (expected a positive integer)")]
    InvalidMagnitude(String),
}

/// A trailing window length such as `24h` or `7d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinceSpec {
    magnitude: u32,
    unit: WindowUnit,
}

impl SinceSpec {
    /// Creates a window of `hours` whole hours.
    pub fn hours(hours: u32) -> Self {
        Self {
            magnitude: hours,
            unit: WindowUnit::Hours,
        }
    }

    /// Creates a window of `days` whole days.
    pub fn days(days: u32) -> Self {
        Self {
            magnitude: days,
            unit: WindowUnit::Days,
        }
    }

    /// Returns the numeric part, e.g. `24` for `24h`.
    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// Returns the unit.
    pub fn unit(&self) -> WindowUnit {
        self.unit
    }

    /// Returns the window length as a chrono duration.
    pub fn duration(&self) -> Duration {
        let magnitude = i64::from(self.magnitude);
        match self.unit {
            WindowUnit::Hours => Duration::hours(magnitude),
            WindowUnit::Days => Duration::days(magnitude),
        }
    }

    /// Human-readable form used in report headings, e.g. `24 hours`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.magnitude, self.unit.noun(self.magnitude))
    }
}

impl Default for SinceSpec {
    fn default() -> Self {
        Self::hours(24)
    }
}

impl fmt::Display for SinceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

impl FromStr for SinceSpec {
    type Err = SinceSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unit_char = s.chars().last().ok_or(SinceSpecError::Empty)?;

        let unit = match unit_char.to_ascii_lowercase() {
            'h' => WindowUnit::Hours,
            'd' => WindowUnit::Days,
            other => return Err(SinceSpecError::UnknownUnit(other)),
        };

        let digits = &s[..s.len() - unit_char.len_utf8()];
        let magnitude = digits
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| SinceSpecError::InvalidMagnitude(digits.to_string()))?;

        Ok(Self { magnitude, unit })
    }
}

/// A trailing window ending at a reference instant.
///
/// An instant is inside the window iff it is at or after the cutoff
/// (`now - spec`). There is no upper bound: items dated after `now` are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// The reference instant the window trails from.
    pub now: DateTime<Utc>,
    /// Oldest instant still inside the window (inclusive).
    pub cutoff: DateTime<Utc>,
    /// The window length it was built from.
    pub spec: SinceSpec,
}

impl TimeWindow {
    /// Creates a window of length `spec` trailing `now`.
    ///
    /// A window reaching past the earliest representable instant is clamped.
    pub fn trailing(now: DateTime<Utc>, spec: SinceSpec) -> Self {
        let cutoff = now
            .checked_sub_signed(spec.duration())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { now, cutoff, spec }
    }

    /// Checks whether a normalized instant falls inside the window.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.cutoff
    }

    /// Returns the window length.
    pub fn duration(&self) -> Duration {
        self.now - self.cutoff
    }
}

/// Normalizes a date-only value to 12:00 UTC on that date.
///
/// Midday keeps the calendar date stable when the instant is later shown in
/// any display zone within ±12 hours of UTC.
pub fn date_only_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0)
        .expect("noon is a valid time")
        .and_utc()
}
