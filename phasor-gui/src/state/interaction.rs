//! Interaction state machine for the phasor plot.
//!
//! Owns the view transform and mutates it only through named
//! transitions. Pointer state is `Idle -> Panning` (secondary button) or
//! `Idle -> ZoomBoxArmed -> DraggingZoomBox` (zoom-box key then primary
//! drag); the circle cursor and the overlay toggle are orthogonal
//! sub-state. Every transition reports which surfaces need repainting so
//! the full point set is not redrawn on plain cursor motion.

use phasor_core::transform::MIN_ZOOM_BOX;
use phasor_core::PlotTransform;

/// Cursor radius bounds in screen pixels.
pub const MIN_CURSOR_RADIUS: f64 = 2.0;
pub const MAX_CURSOR_RADIUS: f64 = 300.0;

/// Scroll step for cursor radius and wheel zoom.
const SCROLL_STEP: f64 = 1.2;

/// Which surfaces a transition invalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redraw {
    /// Full plot (axes, points, reference curve).
    pub plot: bool,
    /// Overlay (zoom box, circle cursor, instructions).
    pub overlay: bool,
}

impl Redraw {
    pub const NONE: Self = Self {
        plot: false,
        overlay: false,
    };
    pub const PLOT: Self = Self {
        plot: true,
        overlay: true,
    };
    pub const OVERLAY: Self = Self {
        plot: false,
        overlay: true,
    };
}

/// Pointer interaction mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMode {
    Idle,
    Panning { last: (f64, f64) },
    ZoomBoxArmed,
    DraggingZoomBox { start: (f64, f64), current: (f64, f64) },
}

/// Circle cursor sub-state.
#[derive(Debug, Clone, Copy)]
pub struct CircleCursor {
    pub enabled: bool,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Default for CircleCursor {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: false,
            x: 0.0,
            y: 0.0,
            radius: 10.0,
        }
    }
}

/// Interaction session state; lives on the UI thread only.
#[derive(Debug)]
pub struct InteractionState {
    pub transform: PlotTransform,
    mode: PointerMode,
    pub cursor: CircleCursor,
    pub overlay_visible: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            transform: PlotTransform::default(),
            mode: PointerMode::Idle,
            cursor: CircleCursor::default(),
            overlay_visible: true,
        }
    }

    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    /// Zoom-box mode is armed or a box is being dragged.
    pub fn zoom_box_armed(&self) -> bool {
        matches!(
            self.mode,
            PointerMode::ZoomBoxArmed | PointerMode::DraggingZoomBox { .. }
        )
    }

    /// The in-progress zoom box as (left, top, right, bottom).
    pub fn drag_box(&self) -> Option<(f64, f64, f64, f64)> {
        match self.mode {
            PointerMode::DraggingZoomBox { start, current } => Some((
                start.0.min(current.0),
                start.1.min(current.1),
                start.0.max(current.0),
                start.1.max(current.1),
            )),
            _ => None,
        }
    }

    /// Circle cursor is drawn and drives highlighting.
    ///
    /// Hidden while a zoom box is being dragged.
    pub fn cursor_active(&self) -> bool {
        self.cursor.enabled
            && self.cursor.visible
            && !matches!(self.mode, PointerMode::DraggingZoomBox { .. })
    }

    /// Primary button pressed at a canvas position.
    pub fn primary_pressed(&mut self, x: f64, y: f64) -> Redraw {
        if self.mode == PointerMode::ZoomBoxArmed {
            self.mode = PointerMode::DraggingZoomBox {
                start: (x, y),
                current: (x, y),
            };
            return Redraw::OVERLAY;
        }
        Redraw::NONE
    }

    /// Secondary button pressed: cancels an armed zoom box, otherwise
    /// starts panning.
    pub fn secondary_pressed(&mut self, x: f64, y: f64) -> Redraw {
        if self.zoom_box_armed() {
            self.mode = PointerMode::Idle;
            return Redraw::OVERLAY;
        }
        self.mode = PointerMode::Panning { last: (x, y) };
        Redraw::NONE
    }

    /// Pointer dragged to a new canvas position.
    pub fn pointer_dragged(&mut self, x: f64, y: f64) -> Redraw {
        match &mut self.mode {
            PointerMode::DraggingZoomBox { current, .. } => {
                *current = (x, y);
                Redraw::OVERLAY
            }
            PointerMode::Panning { last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                self.transform.translate(dx, dy);
                Redraw::PLOT
            }
            _ => Redraw::NONE,
        }
    }

    /// Primary button released; applies the zoom box if large enough.
    ///
    /// Either way the armed state is cleared; one box per arming.
    pub fn primary_released(&mut self, canvas_width: f64, canvas_height: f64) -> Redraw {
        if let PointerMode::DraggingZoomBox { start, current } = self.mode {
            self.mode = PointerMode::Idle;
            let (left, top) = (start.0.min(current.0), start.1.min(current.1));
            let (right, bottom) = (start.0.max(current.0), start.1.max(current.1));
            if right - left > MIN_ZOOM_BOX && bottom - top > MIN_ZOOM_BOX {
                self.transform
                    .zoom_to_box(left, top, right, bottom, canvas_width, canvas_height);
                return Redraw::PLOT;
            }
            return Redraw::OVERLAY;
        }
        Redraw::NONE
    }

    /// Secondary button released; ends panning.
    pub fn secondary_released(&mut self) -> Redraw {
        if matches!(self.mode, PointerMode::Panning { .. }) {
            self.mode = PointerMode::Idle;
        }
        Redraw::NONE
    }

    /// Pointer moved without a button held.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Redraw {
        if self.cursor.enabled {
            self.cursor.x = x;
            self.cursor.y = y;
            self.cursor.visible = true;
            return Redraw::OVERLAY;
        }
        Redraw::NONE
    }

    /// Pointer entered the plot area.
    pub fn pointer_entered(&mut self) -> Redraw {
        if self.cursor.enabled {
            self.cursor.visible = true;
            return Redraw::OVERLAY;
        }
        Redraw::NONE
    }

    /// Pointer left the plot area; the caller clears highlights.
    pub fn pointer_exited(&mut self) -> Redraw {
        if self.cursor.enabled {
            self.cursor.visible = false;
            return Redraw::OVERLAY;
        }
        Redraw::NONE
    }

    /// Scroll wheel: resizes the circle cursor while it is active,
    /// otherwise zooms about the pointer.
    pub fn scroll(&mut self, x: f64, y: f64, delta_y: f64) -> Redraw {
        if delta_y == 0.0 {
            return Redraw::NONE;
        }
        if self.cursor_active() {
            let factor = if delta_y > 0.0 {
                SCROLL_STEP
            } else {
                1.0 / SCROLL_STEP
            };
            self.cursor.radius =
                (self.cursor.radius * factor).clamp(MIN_CURSOR_RADIUS, MAX_CURSOR_RADIUS);
            return Redraw::OVERLAY;
        }
        let factor = if delta_y > 0.0 {
            SCROLL_STEP
        } else {
            1.0 / SCROLL_STEP
        };
        self.transform.zoom_at_point(x, y, factor);
        Redraw::PLOT
    }

    /// Toggle zoom-box mode (Z key).
    pub fn toggle_zoom_box(&mut self) -> Redraw {
        self.mode = if self.zoom_box_armed() {
            PointerMode::Idle
        } else {
            PointerMode::ZoomBoxArmed
        };
        Redraw::OVERLAY
    }

    /// Toggle the circle cursor (C key); the caller clears highlights
    /// when it is switched off.
    pub fn toggle_circle_cursor(&mut self) -> Redraw {
        self.cursor.enabled = !self.cursor.enabled;
        if !self.cursor.enabled {
            self.cursor.visible = false;
        }
        Redraw::OVERLAY
    }

    /// Toggle the instruction overlay (H key).
    pub fn toggle_overlay(&mut self) -> Redraw {
        self.overlay_visible = !self.overlay_visible;
        Redraw::OVERLAY
    }

    /// Reset the view (R key).
    pub fn reset_view(&mut self) -> Redraw {
        self.transform.reset();
        Redraw::PLOT
    }

    /// Fit the plot rectangle to the canvas (F key).
    pub fn fit_to_content(&mut self, canvas_width: f64, canvas_height: f64) -> Redraw {
        self.transform.fit_to_content(canvas_width, canvas_height);
        Redraw::PLOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zoom_box_drag_applies_and_disarms() {
        let mut st = InteractionState::new();
        st.toggle_zoom_box();
        assert!(st.zoom_box_armed());
        st.primary_pressed(100.0, 100.0);
        st.pointer_dragged(300.0, 250.0);
        let before = st.transform;
        st.primary_released(800.0, 600.0);
        assert_eq!(st.mode(), PointerMode::Idle);
        assert!(!st.zoom_box_armed());
        assert_ne!(st.transform, before);
        assert!(st.transform.scale() > 1.0);
    }

    #[test]
    fn tiny_zoom_box_is_a_no_op() {
        let mut st = InteractionState::new();
        st.toggle_zoom_box();
        st.primary_pressed(100.0, 100.0);
        st.pointer_dragged(105.0, 105.0);
        let before = st.transform;
        st.primary_released(800.0, 600.0);
        assert_eq!(st.transform, before);
        assert_eq!(st.mode(), PointerMode::Idle);
    }

    #[test]
    fn secondary_press_cancels_armed_zoom_box() {
        let mut st = InteractionState::new();
        st.toggle_zoom_box();
        st.secondary_pressed(10.0, 10.0);
        assert_eq!(st.mode(), PointerMode::Idle);
        // No pan was started by the cancelling press.
        st.pointer_dragged(50.0, 50.0);
        assert_eq!(st.transform, PlotTransform::default());
    }

    #[test]
    fn panning_translates_continuously() {
        let mut st = InteractionState::new();
        st.secondary_pressed(10.0, 20.0);
        st.pointer_dragged(25.0, 20.0);
        st.pointer_dragged(30.0, 26.0);
        assert_relative_eq!(st.transform.offset_x(), 20.0);
        assert_relative_eq!(st.transform.offset_y(), 6.0);
        st.secondary_released();
        assert_eq!(st.mode(), PointerMode::Idle);
        st.pointer_dragged(100.0, 100.0);
        assert_relative_eq!(st.transform.offset_x(), 20.0);
    }

    #[test]
    fn primary_press_only_starts_box_when_armed() {
        let mut st = InteractionState::new();
        st.primary_pressed(10.0, 10.0);
        assert_eq!(st.mode(), PointerMode::Idle);
    }

    #[test]
    fn scroll_resizes_cursor_within_bounds() {
        let mut st = InteractionState::new();
        st.cursor_moved(50.0, 50.0);
        assert!(st.cursor_active());
        for _ in 0..60 {
            st.scroll(50.0, 50.0, 1.0);
        }
        assert_relative_eq!(st.cursor.radius, MAX_CURSOR_RADIUS);
        for _ in 0..80 {
            st.scroll(50.0, 50.0, -1.0);
        }
        assert_relative_eq!(st.cursor.radius, MIN_CURSOR_RADIUS);
        // The view never moved: scroll with an active cursor is not zoom.
        assert_eq!(st.transform, PlotTransform::default());
    }

    #[test]
    fn scroll_zooms_when_cursor_inactive() {
        let mut st = InteractionState::new();
        st.toggle_circle_cursor();
        st.scroll(100.0, 100.0, 1.0);
        assert!(st.transform.scale() > 1.0);
    }

    #[test]
    fn cursor_hidden_while_dragging_box() {
        let mut st = InteractionState::new();
        st.cursor_moved(50.0, 50.0);
        st.toggle_zoom_box();
        st.primary_pressed(40.0, 40.0);
        assert!(!st.cursor_active());
    }

    #[test]
    fn exit_hides_cursor_until_reentry() {
        let mut st = InteractionState::new();
        st.cursor_moved(50.0, 50.0);
        st.pointer_exited();
        assert!(!st.cursor_active());
        st.pointer_entered();
        assert!(st.cursor_active());
    }

    #[test]
    fn toggles_flip_orthogonal_state() {
        let mut st = InteractionState::new();
        assert!(st.overlay_visible);
        st.toggle_overlay();
        assert!(!st.overlay_visible);
        st.toggle_circle_cursor();
        assert!(!st.cursor.enabled);
        st.cursor_moved(10.0, 10.0);
        assert!(!st.cursor_active());
    }

    #[test]
    fn reset_and_fit_touch_the_plot() {
        let mut st = InteractionState::new();
        st.secondary_pressed(0.0, 0.0);
        st.pointer_dragged(40.0, 40.0);
        let r = st.reset_view();
        assert!(r.plot);
        assert_eq!(st.transform, PlotTransform::default());
        let r = st.fit_to_content(800.0, 600.0);
        assert!(r.plot);
        assert_ne!(st.transform, PlotTransform::default());
    }
}
