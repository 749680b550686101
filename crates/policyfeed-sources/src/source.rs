//! Source trait definition.
//!
//! A [`Source`] is one configured feed or calendar URL. It fetches its
//! upstream document and turns every record with a resolvable timestamp into
//! a [`NormalizedItem`]. Records without one are dropped inside the source.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use policyfeed_core::{Category, NormalizedItem};

use crate::error::{SourceError, SourceResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the driver can hold
/// `Vec<Box<dyn Source>>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The kind of upstream a source reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// RSS or Atom feed of press releases.
    Rss,
    /// ICS calendar of hearings and meetings.
    Ics,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Rss, SourceKind::Ics];

    /// The report section items from this kind land in.
    pub fn category(&self) -> Category {
        match self {
            Self::Rss => Category::PressRelease,
            Self::Ics => Category::Event,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Ics => "ics",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rss" | "atom" | "feed" => Ok(Self::Rss),
            "ics" | "ical" | "calendar" => Ok(Self::Ics),
            other => Err(format!("unknown source kind '{other}' (expected rss or ics)")),
        }
    }
}

/// The core abstraction for upstream sources.
///
/// # Example Implementation
///
/// ```ignore
/// impl Source for RssSource {
///     fn kind(&self) -> SourceKind { SourceKind::Rss }
///     fn url(&self) -> &str { &self.url }
///
///     fn fetch_items(&self) -> BoxFuture<'_, SourceResult<Vec<NormalizedItem>>> {
///         Box::pin(async move {
///             let body = self.fetcher.get(&self.url).await?;
///             parse_feed(&body, &self.url)
///         })
///     }
/// }
/// ```
pub trait Source: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// The configured URL; used as the label in diagnostics.
    fn url(&self) -> &str;

    /// Fetches the upstream document and normalizes its records.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on network errors, bad status codes, or an
    /// unparseable document. Individual records that cannot be dated are not
    /// errors; they are dropped.
    fn fetch_items(&self) -> BoxFuture<'_, SourceResult<Vec<NormalizedItem>>>;
}

/// A source that always returns an error.
///
/// Stands in for a source that could not be constructed, so the failure is
/// reported in configured order like any other fetch failure.
#[derive(Debug)]
pub struct ErrorSource {
    kind: SourceKind,
    url: String,
    error: SourceError,
}

impl ErrorSource {
    pub fn new(kind: SourceKind, url: impl Into<String>, error: SourceError) -> Self {
        Self {
            kind,
            url: url.into(),
            error,
        }
    }
}

impl Source for ErrorSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn fetch_items(&self) -> BoxFuture<'_, SourceResult<Vec<NormalizedItem>>> {
        let error = SourceError::new(self.error.code(), self.error.message()).with_url(&self.url);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorCode;

    #[test]
    fn kind_maps_to_category() {
        assert_eq!(SourceKind::Rss.category(), Category::PressRelease);
        assert_eq!(SourceKind::Ics.category(), Category::Event);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("rss".parse(), Ok(SourceKind::Rss));
        assert_eq!(" ICS ".parse(), Ok(SourceKind::Ics));
        assert_eq!("atom".parse(), Ok(SourceKind::Rss));
        assert!("smtp".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::Ics.to_string(), "ics");
    }

    #[tokio::test]
    async fn error_source_returns_error() {
        let source = ErrorSource::new(
            SourceKind::Rss,
            "ftp://example.gov/feed",
            SourceError::configuration("unsupported scheme 'ftp'"),
        );

        assert_eq!(source.kind(), SourceKind::Rss);
        assert_eq!(source.url(), "ftp://example.gov/feed");

        let err = source.fetch_items().await.unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::ConfigurationError);
        assert_eq!(err.url(), Some("ftp://example.gov/feed"));
    }
}
