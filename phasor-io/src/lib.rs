//! phasor-io: TIFF stack decoding for phasor analysis.
//!
//! The dataset store collaborator: callers pre-check openability with
//! [`can_open`] (a cancelled file dialog upstream is a silent no-op),
//! then decode with [`open_stack`]. Decoding failures map onto the input
//! and dimensionality error taxonomy and never partially mutate caller
//! state.

pub mod error;
pub mod stack;

pub use error::{Error, Result};
pub use stack::{can_open, open_stack, SUPPORTED_EXTENSIONS};
