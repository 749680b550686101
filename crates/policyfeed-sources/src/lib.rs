//! Source trait and implementations.
//!
//! - [`Source`] - The trait every upstream implements
//! - [`RssSource`] - RSS/Atom press-release feeds
//! - [`IcsSource`] - ICS hearing and meeting calendars
//! - [`SourceError`] - Error types for source operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │  RSS/Atom feed  │    │  ICS calendar   │
//! └────────┬────────┘    └────────┬────────┘
//!          │     HttpFetcher      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │   RssSource     │    │   IcsSource     │
//! └────────┬────────┘    └────────┬────────┘
//!          │        Source        │
//!          └──────────┬───────────┘
//!                     ▼
//!            ┌──────────────────┐
//!            │  NormalizedItem  │
//!            └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use policyfeed_sources::{HttpConfig, HttpFetcher, RssSource, Source};
//!
//! let fetcher = HttpFetcher::new(&HttpConfig::default())?;
//! let source = RssSource::new("https://www.mass.gov/rss/press", fetcher)?;
//! let items = source.fetch_items().await?;
//! ```

pub mod error;
pub mod http;
pub mod ics;
pub mod rss;
pub mod source;

pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use http::{HttpConfig, HttpFetcher, default_user_agent, validate_url};
pub use ics::IcsSource;
pub use rss::RssSource;
pub use source::{BoxFuture, ErrorSource, Source, SourceKind};
