//! Background workers: image loading and dataset recompute.
//!
//! Workers run on plain spawned threads and report back through the
//! application message channel. They never touch UI state directly.

pub mod loader;
pub mod recompute;

pub use loader::{load_calibration_worker, load_image_worker};
pub use recompute::spawn_recompute;
