//! I/O error types.

use thiserror::Error;

/// Result type for stack decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// Input errors for image stack decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File format not supported for import.
    #[error("unsupported file format: {0}")]
    Unsupported(String),

    /// File decoded but the pixel data is malformed.
    #[error("decode error: {0}")]
    Decode(String),

    /// Pages of the stack disagree on shape or the stack is unusable.
    #[error(transparent)]
    Dimensionality(#[from] phasor_core::Error),
}

impl From<tiff::TiffError> for Error {
    fn from(err: tiff::TiffError) -> Self {
        match err {
            tiff::TiffError::IoError(io) => Error::Io(io),
            tiff::TiffError::UnsupportedError(e) => Error::Unsupported(e.to_string()),
            other => Error::Decode(other.to_string()),
        }
    }
}
