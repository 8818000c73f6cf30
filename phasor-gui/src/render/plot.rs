//! Full plot surface: axes, grid, labels, reference curve, points.
//!
//! Everything here goes through the fixed affine map and then the
//! pan/zoom layer, so the plot follows the view transform while stroke
//! widths stay in screen pixels.

use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke};
use phasor_core::transform::{PLOT_BOTTOM, PLOT_HEIGHT, PLOT_LEFT, PLOT_RIGHT, PLOT_TOP, PLOT_WIDTH};
use phasor_core::{PhasorPoint, PlotTransform};

use crate::ui::theme::{accent, dark};
use crate::util::f64_to_f32;

/// Map a world coordinate through the view layer into canvas space.
pub fn world_to_canvas(rect: Rect, t: &PlotTransform, wx: f64, wy: f64) -> Pos2 {
    let (x, y) = t.apply_view(wx, wy);
    Pos2::new(rect.left() + f64_to_f32(x), rect.top() + f64_to_f32(y))
}

/// Map a data coordinate all the way into canvas space.
pub fn data_to_canvas(rect: Rect, t: &PlotTransform, g: f64, s: f64) -> Pos2 {
    let (wx, wy) = t.data_to_screen(g, s);
    world_to_canvas(rect, t, wx, wy)
}

/// Redraw the whole plot: axes, grid, labels, universal semicircle, and
/// the current phasor point set.
pub fn draw_plot(painter: &egui::Painter, rect: Rect, t: &PlotTransform, points: &[PhasorPoint]) {
    draw_axes(painter, rect, t);
    draw_grid(painter, rect, t);
    draw_labels(painter, rect, t);
    draw_universal_semicircle(painter, rect, t);
    draw_points(painter, rect, t, points);
}

fn draw_axes(painter: &egui::Painter, rect: Rect, t: &PlotTransform) {
    let stroke = Stroke::new(2.0, dark::TEXT_PRIMARY);
    // G axis (horizontal, 0..1) and S axis (vertical, 0..0.6).
    painter.line_segment(
        [
            world_to_canvas(rect, t, PLOT_LEFT, PLOT_BOTTOM),
            world_to_canvas(rect, t, PLOT_RIGHT, PLOT_BOTTOM),
        ],
        stroke,
    );
    painter.line_segment(
        [
            world_to_canvas(rect, t, PLOT_LEFT, PLOT_BOTTOM),
            world_to_canvas(rect, t, PLOT_LEFT, PLOT_TOP),
        ],
        stroke,
    );
}

fn draw_grid(painter: &egui::Painter, rect: Rect, t: &PlotTransform) {
    let stroke = Stroke::new(1.0, dark::BORDER);
    for i in 1..=10 {
        let x = PLOT_LEFT + f64::from(i) * PLOT_WIDTH / 10.0;
        painter.line_segment(
            [
                world_to_canvas(rect, t, x, PLOT_BOTTOM),
                world_to_canvas(rect, t, x, PLOT_TOP),
            ],
            stroke,
        );
    }
    for i in 1..=6 {
        let y = PLOT_BOTTOM - f64::from(i) * PLOT_HEIGHT / 6.0;
        painter.line_segment(
            [
                world_to_canvas(rect, t, PLOT_LEFT, y),
                world_to_canvas(rect, t, PLOT_RIGHT, y),
            ],
            stroke,
        );
    }
}

fn draw_labels(painter: &egui::Painter, rect: Rect, t: &PlotTransform) {
    let font = FontId::monospace(11.0);
    let tick = Stroke::new(1.0, dark::TEXT_PRIMARY);

    // G-axis ticks and labels (0 to 1).
    for i in 0..=10 {
        let x = PLOT_LEFT + f64::from(i) * PLOT_WIDTH / 10.0;
        let value = f64::from(i) * 0.1;
        let above = world_to_canvas(rect, t, x, PLOT_BOTTOM - 3.0);
        let below = world_to_canvas(rect, t, x, PLOT_BOTTOM + 3.0);
        painter.line_segment([above, below], tick);
        let label_pos = world_to_canvas(rect, t, x, PLOT_BOTTOM + 20.0);
        painter.text(
            label_pos,
            Align2::CENTER_CENTER,
            format!("{value:.1}"),
            font.clone(),
            dark::TEXT_MUTED,
        );
    }

    // S-axis ticks and labels (0 to 0.6).
    for i in 0..=6 {
        let y = PLOT_BOTTOM - f64::from(i) * PLOT_HEIGHT / 6.0;
        let value = f64::from(i) * 0.1;
        let left = world_to_canvas(rect, t, PLOT_LEFT - 3.0, y);
        let right = world_to_canvas(rect, t, PLOT_LEFT + 3.0, y);
        painter.line_segment([left, right], tick);
        let label_pos = world_to_canvas(rect, t, PLOT_LEFT - 25.0, y);
        painter.text(
            label_pos,
            Align2::CENTER_CENTER,
            format!("{value:.1}"),
            font.clone(),
            dark::TEXT_MUTED,
        );
    }

    // Axis titles.
    let title_font = FontId::monospace(13.0);
    painter.text(
        world_to_canvas(rect, t, PLOT_LEFT + PLOT_WIDTH / 2.0, PLOT_BOTTOM + 45.0),
        Align2::CENTER_CENTER,
        "G",
        title_font.clone(),
        dark::TEXT_PRIMARY,
    );
    painter.text(
        world_to_canvas(rect, t, PLOT_LEFT - 50.0, PLOT_TOP + PLOT_HEIGHT / 2.0),
        Align2::CENTER_CENTER,
        "S",
        title_font,
        dark::TEXT_PRIMARY,
    );
}

/// Reference curve: semicircle centered at (0.5, 0) with radius 0.5.
fn draw_universal_semicircle(painter: &egui::Painter, rect: Rect, t: &PlotTransform) {
    const SEGMENTS: usize = 96;
    let points: Vec<Pos2> = (0..=SEGMENTS)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let theta = std::f64::consts::PI * (i as f64) / (SEGMENTS as f64);
            data_to_canvas(rect, t, 0.5 + 0.5 * theta.cos(), 0.5 * theta.sin())
        })
        .collect();
    painter.add(Shape::line(points, Stroke::new(1.0, dark::TEXT_PRIMARY)));
}

fn draw_points(painter: &egui::Painter, rect: Rect, t: &PlotTransform, points: &[PhasorPoint]) {
    let mut shapes = Vec::with_capacity(points.len());
    for point in points {
        let pos = data_to_canvas(rect, t, f64::from(point.g), f64::from(point.s));
        if rect.contains(pos) {
            shapes.push(Shape::circle_filled(pos, 1.0, accent::BLUE));
        }
    }
    painter.extend(shapes);
}

/// Red boxes over the intensity image pixels currently selected by the
/// circle cursor.
pub fn draw_pixel_highlights(
    painter: &egui::Painter,
    image_rect: Rect,
    image_size: (usize, usize),
    highlighted: &[(u32, u32)],
) {
    let (rows, cols) = image_size;
    if rows == 0 || cols == 0 {
        return;
    }
    let pixel_w = image_rect.width() / crate::util::usize_to_f32(cols);
    let pixel_h = image_rect.height() / crate::util::usize_to_f32(rows);
    let fill = Color32::from_rgba_unmultiplied(0xef, 0x44, 0x44, 150);
    let stroke = Stroke::new(0.5, accent::RED);

    for &(x, y) in highlighted {
        let min = Pos2::new(
            image_rect.left() + crate::util::usize_to_f32(x as usize) * pixel_w,
            image_rect.top() + crate::util::usize_to_f32(y as usize) * pixel_h,
        );
        let px = Rect::from_min_size(min, egui::vec2(pixel_w, pixel_h));
        painter.rect_filled(px, 0.0, fill);
        painter.rect_stroke(px, 0.0, stroke);
    }
}
