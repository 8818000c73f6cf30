//! Processing state for background operations.

/// Tracks the state of background loading and recompute operations.
pub struct ProcessingState {
    /// Whether an image is currently being loaded.
    pub is_loading: bool,
    /// Whether a recompute pass is in flight.
    pub is_recomputing: bool,
    /// Progress value from 0.0 to 1.0.
    pub progress: f32,
    /// User-facing status message.
    pub status_text: String,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self {
            is_loading: false,
            is_recomputing: false,
            progress: 0.0,
            status_text: "Ready".to_string(),
        }
    }
}

impl ProcessingState {
    pub fn busy(&self) -> bool {
        self.is_loading || self.is_recomputing
    }
}
