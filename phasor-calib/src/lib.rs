//! phasor-calib: Calibration state and the phasor recompute pass.
//!
//! Calibration parameters are process-wide: any change re-derives every
//! entry's current g/s planes from its immutable raw field. The actual
//! transform runs behind the injected [`PhasorCompute`] interface;
//! threading and result marshalling belong to the GUI pipeline.

pub mod compute;
pub mod error;
pub mod recompute;
pub mod state;

pub use compute::{ManualCompute, PhasorCompute};
pub use error::{ComputeError, Result};
pub use recompute::{recompute_entries, RecomputeOptions};
pub use state::{CalibrationMode, CalibrationParams, CalibrationState};
