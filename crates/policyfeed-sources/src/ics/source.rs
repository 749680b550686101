//! ICS calendar source implementation.

use tracing::debug;
use url::Url;

use policyfeed_core::NormalizedItem;

use crate::error::SourceResult;
use crate::http::{HttpFetcher, validate_url};
use crate::source::{BoxFuture, Source, SourceKind};

use super::parse::parse_ics_content;

/// A hearings/meetings calendar. Items are labelled with the calendar URL.
pub struct IcsSource {
    url: String,
    parsed_url: Url,
    fetcher: HttpFetcher,
}

impl IcsSource {
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

impl Source for IcsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Ics
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn fetch_items(&self) -> BoxFuture<'_, SourceResult<Vec<NormalizedItem>>> {
        Box::pin(async move {
            debug!(url = %self.url, "Fetching calendar");
            let body = self.fetcher.get(&self.parsed_url).await?;
            parse_ics_content(&body, &self.url).map_err(|e| e.with_url(&self.url))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpConfig;

    #[test]
    fn construction() {
        let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
        let source = IcsSource::new("https://example.gov/cal.ics", fetcher.clone()).unwrap();
        assert_eq!(source.kind(), SourceKind::Ics);
        assert_eq!(source.url(), "https://example.gov/cal.ics");

        assert!(IcsSource::new("webcal://example.gov/cal.ics", fetcher).is_err());
    }
}
