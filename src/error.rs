use thiserror::Error;

/// Errors produced by the diagnostic library.
///
/// Transport failures are folded into failed test results by the probes and
/// never escape a diagnostic run; the other variants surface through the
/// library API when the runner itself cannot be constructed.
#[derive(Error, Debug, Clone)]
pub enum DiagError {
    #[error("Connection Error: {0}")]
    Transport(String),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}
