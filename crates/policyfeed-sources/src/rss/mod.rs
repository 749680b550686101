//! RSS and Atom feed source.
//!
//! Feeds are fetched over HTTP and read with a streaming XML parser that keeps
//! the raw date text of each entry, so timestamps can be resolved through the
//! full fallback chain (`published`, `updated`, `created`, then the scraped
//! calendar components).

mod source;
mod xml;

pub use source::{RssSource, feed_items};
pub use xml::{FeedDocument, FeedEntry, FeedFormat, parse_feed};
