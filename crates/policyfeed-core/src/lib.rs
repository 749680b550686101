//! Core types: items, timestamp resolution, time windows, filters, rendering

pub mod filter;
pub mod format;
pub mod item;
pub mod resolve;
pub mod time;
pub mod tracing;

pub use filter::{ItemFilter, KeywordFilter};
pub use format::{
    clean_text, markdown_link, DisplayZone, ReportOptions, ReportRenderer,
    DEFAULT_DISPLAY_TIMEZONE, DEFAULT_REPORT_TITLE,
};
pub use item::{Category, NormalizedItem, UNTITLED};
pub use resolve::{parse_timestamp, scrape_components, FallbackChain, Resolved};
pub use time::{date_only_instant, SinceSpec, SinceSpecError, TimeWindow, WindowUnit};
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
