//! Application state modules.

mod interaction;
mod processing;
mod ui;

pub use interaction::{CircleCursor, InteractionState, PointerMode, Redraw};
pub use ui::UiState;
pub use processing::ProcessingState;
