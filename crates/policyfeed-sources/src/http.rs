//! HTTP fetching shared by all sources.
//!
//! One GET per source, bounded by a whole-request timeout. No retries.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::error::{SourceError, SourceResult};

/// HTTP settings applied to every fetch.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

/// The user agent sent when none is configured.
pub fn default_user_agent() -> String {
    format!("policyfeed/{}", env!("CARGO_PKG_VERSION"))
}

/// Parses a source URL, accepting only `http` and `https`.
pub fn validate_url(url: &str) -> SourceResult<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| {
        SourceError::configuration(format!("invalid URL: {}", e))
            .with_url(url)
            .with_source(e)
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(
            SourceError::configuration(format!("unsupported URL scheme '{}'", other)).with_url(url),
        ),
    }
}

/// A thin GET client; cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                SourceError::network(format!("failed to create HTTP client: {}", e)).with_source(e)
            })?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches `url` and returns the decoded body.
    pub async fn get(&self, url: &Url) -> SourceResult<String> {
        trace!(url = %url, "Sending request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        debug!(url = %url, status = %status, "Received response");

        if let Some(err) = status_error(status) {
            return Err(err.with_url(url.as_str()));
        }

        response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))
    }

    fn transport_error(&self, url: &Url, e: reqwest::Error) -> SourceError {
        let message = if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else {
            format!("request failed: {}", e)
        };
        SourceError::network(message)
            .with_url(url.as_str())
            .with_source(e)
    }
}

/// Maps a non-success status to its error; `None` for 2xx.
fn status_error(status: StatusCode) -> Option<SourceError> {
    match status {
        s if s.is_success() => None,
        StatusCode::NOT_FOUND => Some(SourceError::not_found("resource not found (404)")),
        StatusCode::TOO_MANY_REQUESTS => Some(SourceError::rate_limited("too many requests (429)")),
        s if s.is_server_error() => Some(SourceError::server(format!("server error ({})", s))),
        s => Some(SourceError::invalid_response(format!(
            "unexpected status {}",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorCode;

    mod validate {
        use super::*;

        #[test]
        fn accepts_http_and_https() {
            assert!(validate_url("https://malegislature.gov/rss").is_ok());
            assert!(validate_url(" http://example.gov/cal.ics ").is_ok());
        }

        #[test]
        fn rejects_other_schemes() {
            let err = validate_url("ftp://example.gov/feed").unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::ConfigurationError);
            assert_eq!(err.url(), Some("ftp://example.gov/feed"));
        }

        #[test]
        fn rejects_malformed() {
            let err = validate_url("not a url").unwrap_err();
            assert_eq!(err.code(), SourceErrorCode::ConfigurationError);
        }
    }

    mod status {
        use super::*;

        #[test]
        fn success_is_none() {
            assert!(status_error(StatusCode::OK).is_none());
            assert!(status_error(StatusCode::NO_CONTENT).is_none());
        }

        #[test]
        fn maps_codes() {
            let code = |s| status_error(s).map(|e| e.code());
            assert_eq!(code(StatusCode::NOT_FOUND), Some(SourceErrorCode::NotFound));
            assert_eq!(
                code(StatusCode::TOO_MANY_REQUESTS),
                Some(SourceErrorCode::RateLimited)
            );
            assert_eq!(
                code(StatusCode::BAD_GATEWAY),
                Some(SourceErrorCode::ServerError)
            );
            assert_eq!(
                code(StatusCode::FORBIDDEN),
                Some(SourceErrorCode::InvalidResponse)
            );
        }
    }

    #[test]
    fn fetcher_creation() {
        let config = HttpConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("policyfeed-test");
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("policyfeed/"));
    }
}
