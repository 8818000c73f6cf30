//! Plot rendering: full plot surface, interaction overlay, PNG snapshot.

pub mod overlay;
pub mod plot;
pub mod snapshot;
