//! Plot coordinate transform: fixed data rectangle, pan and zoom.
//!
//! The logical data rectangle G in [0, 1], S in [0, 0.6] maps onto a
//! fixed world rectangle through an affine map that never changes; pan
//! and zoom are a separate layer applied on top at draw time. Points on
//! screen are therefore `world * scale + offset`, and `screen_to_data`
//! inverts both layers.

/// Left edge of the fixed plot rectangle in world coordinates.
pub const PLOT_LEFT: f64 = 100.0;
/// Top edge of the fixed plot rectangle.
pub const PLOT_TOP: f64 = 100.0;
/// Width of the fixed plot rectangle.
pub const PLOT_WIDTH: f64 = 500.0;
/// Height of the fixed plot rectangle.
pub const PLOT_HEIGHT: f64 = 300.0;
/// Right edge of the fixed plot rectangle.
pub const PLOT_RIGHT: f64 = PLOT_LEFT + PLOT_WIDTH;
/// Bottom edge of the fixed plot rectangle.
pub const PLOT_BOTTOM: f64 = PLOT_TOP + PLOT_HEIGHT;

/// Upper bound of the S axis; G spans [0, 1].
pub const S_MAX: f64 = 0.6;

/// Zoom scale bounds.
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 20.0;

/// Minimum zoom-box edge in screen pixels; smaller boxes are ignored.
pub const MIN_ZOOM_BOX: f64 = 10.0;

/// Pan/zoom view state over the fixed plot rectangle.
///
/// Owned by the interaction layer and mutated only through the named
/// operations below; invalid requests (non-finite or non-positive
/// scales) are silently rejected and leave the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotTransform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Default for PlotTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl PlotTransform {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Map a data point to the fixed world rectangle.
    ///
    /// Pan/zoom is deliberately not applied here; the renderer applies it
    /// as a separate layer via [`PlotTransform::apply_view`].
    pub fn data_to_screen(&self, g: f64, s: f64) -> (f64, f64) {
        (
            PLOT_LEFT + g * PLOT_WIDTH,
            PLOT_BOTTOM - (s / S_MAX) * PLOT_HEIGHT,
        )
    }

    /// Apply the pan/zoom layer to a world coordinate.
    pub fn apply_view(&self, world_x: f64, world_y: f64) -> (f64, f64) {
        (
            world_x * self.scale + self.offset_x,
            world_y * self.scale + self.offset_y,
        )
    }

    /// Map a canvas position back to data coordinates, inverting the
    /// current pan/zoom and then the fixed affine map.
    pub fn screen_to_data(&self, x: f64, y: f64) -> (f64, f64) {
        let world_x = (x - self.offset_x) / self.scale;
        let world_y = (y - self.offset_y) / self.scale;
        (
            (world_x - PLOT_LEFT) / PLOT_WIDTH,
            (PLOT_BOTTOM - world_y) / PLOT_HEIGHT * S_MAX,
        )
    }

    /// Convert a cursor radius in screen pixels to data-space radii.
    pub fn cursor_radius_to_data(&self, radius: f64) -> (f64, f64) {
        (
            radius / (self.scale * PLOT_WIDTH),
            radius / (self.scale * PLOT_HEIGHT) * S_MAX,
        )
    }

    /// Pan by a screen-space delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset_x += dx;
            self.offset_y += dy;
        }
    }

    /// Set the scale directly, clamped to bounds.
    ///
    /// Non-finite or non-positive requests are a no-op.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Zoom by `factor` keeping the data point under `(x, y)` fixed.
    pub fn zoom_at_point(&mut self, x: f64, y: f64, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 || !x.is_finite() || !y.is_finite() {
            return;
        }
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }
        let ratio = new_scale / self.scale;
        self.offset_x = x - (x - self.offset_x) * ratio;
        self.offset_y = y - (y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Zoom so a user-drawn screen rectangle fills 90% of the canvas.
    ///
    /// Boxes under [`MIN_ZOOM_BOX`] pixels in either dimension leave the
    /// state unchanged.
    pub fn zoom_to_box(
        &mut self,
        screen_left: f64,
        screen_top: f64,
        screen_right: f64,
        screen_bottom: f64,
        canvas_width: f64,
        canvas_height: f64,
    ) {
        let left = screen_left.min(screen_right);
        let right = screen_left.max(screen_right);
        let top = screen_top.min(screen_bottom);
        let bottom = screen_top.max(screen_bottom);
        if right - left <= MIN_ZOOM_BOX || bottom - top <= MIN_ZOOM_BOX {
            return;
        }

        // Corners in world coordinates under the *current* transform.
        let world_left = (left - self.offset_x) / self.scale;
        let world_right = (right - self.offset_x) / self.scale;
        let world_top = (top - self.offset_y) / self.scale;
        let world_bottom = (bottom - self.offset_y) / self.scale;

        let box_width = world_right - world_left;
        let box_height = world_bottom - world_top;
        if !(box_width > 0.0 && box_height > 0.0) {
            return;
        }

        let scale_x = (canvas_width * 0.9) / box_width;
        let scale_y = (canvas_height * 0.9) / box_height;
        let new_scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);
        if !new_scale.is_finite() {
            return;
        }

        let box_center_x = (world_left + world_right) / 2.0;
        let box_center_y = (world_top + world_bottom) / 2.0;
        self.offset_x = canvas_width / 2.0 - box_center_x * new_scale;
        self.offset_y = canvas_height / 2.0 - box_center_y * new_scale;
        self.scale = new_scale;
    }

    /// Scale and center so the fixed plot rectangle fills 80% of the
    /// canvas, with room for axis labels.
    pub fn fit_to_content(&mut self, canvas_width: f64, canvas_height: f64) {
        let scale_x = canvas_width * 0.8 / (PLOT_WIDTH + 100.0);
        let scale_y = canvas_height * 0.8 / (PLOT_HEIGHT + 100.0);
        let new_scale = scale_x.min(scale_y);
        if !new_scale.is_finite() || new_scale <= 0.0 {
            return;
        }
        self.scale = new_scale.clamp(MIN_SCALE, MAX_SCALE);

        let plot_center_x = PLOT_LEFT + PLOT_WIDTH / 2.0;
        let plot_center_y = PLOT_TOP + PLOT_HEIGHT / 2.0;
        self.offset_x = canvas_width / 2.0 - plot_center_x * self.scale;
        self.offset_y = canvas_height / 2.0 - plot_center_y * self.scale;
    }

    /// Back to scale 1, no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a canvas position lands inside the plot rectangle.
    pub fn is_inside_plot_area(&self, x: f64, y: f64) -> bool {
        let world_x = (x - self.offset_x) / self.scale;
        let world_y = (y - self.offset_y) / self.scale;
        (PLOT_LEFT..=PLOT_RIGHT).contains(&world_x) && (PLOT_TOP..=PLOT_BOTTOM).contains(&world_y)
    }
}
