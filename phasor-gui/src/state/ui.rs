//! UI state for panel selections and display options.

use crate::viewer::Colormap;

/// Panel selections and display toggles.
pub struct UiState {
    /// Entry whose intensity image is shown for pixel highlighting.
    pub selected_entry: Option<usize>,
    /// Intensity false-color selection.
    pub colormap: Colormap,
    /// Calibration file name shown in the panel (or a loading notice).
    pub calib_file_label: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_entry: None,
            colormap: Colormap::Grayscale,
            calib_file_label: String::new(),
        }
    }
}
