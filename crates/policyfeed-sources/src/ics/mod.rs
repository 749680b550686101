//! ICS calendar source for hearings and meeting notices.

mod parse;
mod source;

pub use parse::{parse_ics_content, start_instant};
pub use source::IcsSource;
