//! Error types for calibration compute.

use thiserror::Error;

/// Result type alias for calibration operations.
pub type Result<T> = std::result::Result<T, ComputeError>;

/// Failures of the external compute collaborator or the recompute pass.
#[derive(Error, Debug)]
pub enum ComputeError {
    /// The transform itself faulted.
    #[error("compute failed: {0}")]
    Failed(String),

    /// The transform returned without the expected output planes.
    #[error("compute result missing expected output")]
    MissingOutput,

    /// The configured compute backend cannot handle these parameters.
    #[error("unsupported calibration request: {0}")]
    Unsupported(&'static str),

    /// The recompute deadline expired before this entry ran.
    #[error("compute timed out")]
    TimedOut,

    /// A newer parameter change superseded this pass.
    #[error("compute cancelled")]
    Cancelled,

    /// Malformed plane data.
    #[error(transparent)]
    Field(#[from] phasor_core::Error),
}
