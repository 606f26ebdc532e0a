//! OneClickContent API Diagnostic Library
//!
//! This crate exercises the OneClickContent service endpoints from an
//! operator's machine and reports pass/fail status with raw response detail
//! for support triage. Four fixed probes run sequentially: license
//! validation, usage-limit check, authenticated metadata generation, and
//! free-trial metadata generation.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod probes;
pub mod report;
pub mod runner;
pub mod signing;
pub mod types;

// Re-export the types a caller needs to run diagnostics end to end.
pub use crate::config::DiagnosticConfig;
pub use crate::error::DiagError;
pub use crate::runner::DiagnosticRunner;
pub use crate::types::TestResult;

use anyhow::{Context, Result};
use tracing::info;

/// Initialize logging for the diagnostic tool.
pub fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    info!("Logging initialized at {} level", log_level);
    Ok(())
}
