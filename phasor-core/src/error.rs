//! Error types for phasor-core.

use thiserror::Error;

/// Result type alias for phasor-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for phasor data handling.
#[derive(Error, Debug)]
pub enum Error {
    /// The plane stack does not have the expected number of planes.
    #[error("expected a stack of {expected} planes, got {got}")]
    PlaneCount { expected: usize, got: usize },

    /// Two planes that must share a shape do not.
    #[error("plane shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    PlaneShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// The image stack has no pixels.
    #[error("empty image stack")]
    EmptyStack,
}
