//! Application message types for async communication.
//!
//! Messages are sent from background worker threads to the UI thread via
//! channels; all dataset and calibration-state writes happen on the UI
//! thread after a message is drained, never on a worker.

use std::sync::Arc;
use std::time::Duration;

use phasor_core::{ImageEntry, Plane, RawField};

/// Messages sent from background workers to the UI thread.
pub enum AppMessage {
    /// Image loading progress update.
    LoadProgress(f32, String),

    /// An image finished loading and phasor derivation.
    LoadComplete {
        entry: Box<ImageEntry>,
        name: String,
        elapsed: Duration,
    },

    /// Image loading failed; no entry is added.
    LoadError(String),

    /// A calibration reference image finished loading.
    ///
    /// Carries the decoded raw field and the file name for the panel
    /// display.
    CalibImageLoaded(Arc<RawField>, String),

    /// A recompute pass finished.
    ///
    /// `generation` tags the parameter snapshot the pass ran under; a
    /// result whose generation is no longer current is discarded
    /// (single-flight). `planes` holds one per-entry result, index-aligned
    /// with the dataset at dispatch time.
    RecomputeComplete {
        generation: u64,
        planes: Vec<Result<(Plane, Plane), String>>,
        elapsed: Duration,
    },
}
