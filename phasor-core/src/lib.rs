//! phasor-core: Core types for phasor plot analysis.
//!
//! This crate provides the data model shared by the calibration and GUI
//! crates: per-pixel phasor planes, image entries, the flattened phasor
//! point dataset with its elliptical selection query, and the plot
//! coordinate transform.

pub mod dataset;
pub mod error;
pub mod field;
pub mod transform;

pub use dataset::{PhasorDataset, PhasorPoint};
pub use error::{Error, Result};
pub use field::{ImageEntry, Plane, RawField};
pub use transform::PlotTransform;
