//! Interaction overlay: zoom box, circle cursor, key-binding help text.

use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

use crate::state::InteractionState;
use crate::ui::theme::{accent, dark};
use crate::util::f64_to_f32;

const KEY_HELP: &[&str] = &[
    "R  reset view",
    "F  fit to content",
    "H  toggle this help",
    "Z  arm zoom box",
    "C  toggle circle cursor",
];

/// Draw the transient interaction layer on top of the plot.
pub fn draw_overlay(painter: &egui::Painter, rect: Rect, interaction: &InteractionState) {
    if let Some((l, t, r, b)) = interaction.drag_box() {
        draw_zoom_box(painter, rect, l, t, r, b);
    }
    if interaction.cursor_active() {
        draw_circle_cursor(painter, rect, &interaction.cursor);
    }
    if interaction.overlay_visible {
        draw_key_help(painter, rect);
    }
}

fn draw_zoom_box(painter: &egui::Painter, rect: Rect, l: f64, t: f64, r: f64, b: f64) {
    let min = Pos2::new(rect.left() + f64_to_f32(l), rect.top() + f64_to_f32(t));
    let max = Pos2::new(rect.left() + f64_to_f32(r), rect.top() + f64_to_f32(b));
    let zoom_rect = Rect::from_min_max(min, max);
    painter.rect_filled(zoom_rect, 0.0, accent::BLUE.gamma_multiply(0.15));
    painter.rect_stroke(zoom_rect, 0.0, Stroke::new(1.0, Color32::LIGHT_GRAY));
}

fn draw_circle_cursor(painter: &egui::Painter, rect: Rect, cursor: &crate::state::CircleCursor) {
    let center = Pos2::new(
        rect.left() + f64_to_f32(cursor.x),
        rect.top() + f64_to_f32(cursor.y),
    );
    painter.circle_stroke(center, f64_to_f32(cursor.radius), Stroke::new(1.5, accent::GREEN));
}

fn draw_key_help(painter: &egui::Painter, rect: Rect) {
    let font = FontId::monospace(11.0);
    let mut y = rect.top() + 10.0;
    for line in KEY_HELP {
        painter.text(
            Pos2::new(rect.right() - 10.0, y),
            Align2::RIGHT_TOP,
            *line,
            font.clone(),
            dark::TEXT_MUTED,
        );
        y += 14.0;
    }
}
