//! CLI, configuration, run driver and report writing
//!
//! This crate provides the `policyfeed` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod digest;
pub mod error;
pub mod report;

pub use cli::Cli;
pub use config::FeedsConfig;
pub use digest::{RunOptions, RunOutcome};
pub use error::{AppError, AppResult};
