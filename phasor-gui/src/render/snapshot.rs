//! PNG snapshot of the phasor plot, rasterized on the CPU.
//!
//! Independent of the live egui painter so exports work at any size
//! and without a GPU surface.

use std::path::Path;

use image::{Rgba, RgbaImage};
use phasor_core::transform::{PLOT_BOTTOM, PLOT_HEIGHT, PLOT_LEFT, PLOT_RIGHT, PLOT_TOP, PLOT_WIDTH};
use phasor_core::{PhasorPoint, PlotTransform};

const BG: Rgba<u8> = Rgba([0x1f, 0x1f, 0x1f, 0xff]);
const AXIS: Rgba<u8> = Rgba([0xe0, 0xe0, 0xe0, 0xff]);
const GRID: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 0xff]);
const POINT: Rgba<u8> = Rgba([0x4a, 0x9e, 0xff, 0xff]);

/// Rasterize the current plot view into an RGBA image.
pub fn render_snapshot(
    width: u32,
    height: u32,
    transform: &PlotTransform,
    points: &[PhasorPoint],
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, BG);

    let to_px = |wx: f64, wy: f64| {
        let (x, y) = transform.apply_view(wx, wy);
        (x, y)
    };

    // Grid lines behind everything else.
    for i in 1..=10 {
        let x = PLOT_LEFT + f64::from(i) * PLOT_WIDTH / 10.0;
        let (x0, y0) = to_px(x, PLOT_TOP);
        let (x1, y1) = to_px(x, PLOT_BOTTOM);
        draw_line(&mut img, x0, y0, x1, y1, GRID);
    }
    for i in 1..=6 {
        let y = PLOT_BOTTOM - f64::from(i) * PLOT_HEIGHT / 6.0;
        let (x0, y0) = to_px(PLOT_LEFT, y);
        let (x1, y1) = to_px(PLOT_RIGHT, y);
        draw_line(&mut img, x0, y0, x1, y1, GRID);
    }

    // Axes.
    let (ax0, ay0) = to_px(PLOT_LEFT, PLOT_BOTTOM);
    let (ax1, ay1) = to_px(PLOT_RIGHT, PLOT_BOTTOM);
    draw_line(&mut img, ax0, ay0, ax1, ay1, AXIS);
    let (bx1, by1) = to_px(PLOT_LEFT, PLOT_TOP);
    draw_line(&mut img, ax0, ay0, bx1, by1, AXIS);

    // Universal semicircle.
    let mut prev: Option<(f64, f64)> = None;
    for i in 0..=96 {
        #[allow(clippy::cast_precision_loss)]
        let theta = std::f64::consts::PI * (i as f64) / 96.0;
        let (wx, wy) = transform.data_to_screen(0.5 + 0.5 * theta.cos(), 0.5 * theta.sin());
        let (x, y) = to_px(wx, wy);
        if let Some((px, py)) = prev {
            draw_line(&mut img, px, py, x, y, AXIS);
        }
        prev = Some((x, y));
    }

    // Points.
    for point in points {
        let (wx, wy) = transform.data_to_screen(f64::from(point.g), f64::from(point.s));
        let (x, y) = to_px(wx, wy);
        put_pixel_checked(&mut img, x, y, POINT);
        put_pixel_checked(&mut img, x + 1.0, y, POINT);
        put_pixel_checked(&mut img, x, y + 1.0, POINT);
        put_pixel_checked(&mut img, x + 1.0, y + 1.0, POINT);
    }

    img
}

/// Render the plot at its current view and write it as PNG.
pub fn save_snapshot(
    path: &Path,
    width: u32,
    height: u32,
    transform: &PlotTransform,
    points: &[PhasorPoint],
) -> anyhow::Result<()> {
    let img = render_snapshot(width, height, transform, points);
    img.save(path)?;
    Ok(())
}

fn put_pixel_checked(img: &mut RgbaImage, x: f64, y: f64, color: Rgba<u8>) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (xi, yi) = (x as u32, y as u32);
    if xi < img.width() && yi < img.height() {
        img.put_pixel(xi, yi, color);
    }
}

fn draw_line(img: &mut RgbaImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0);
    let mut t = 0.0;
    while t <= steps {
        let frac = t / steps;
        put_pixel_checked(
            img,
            x0 + (x1 - x0) * frac,
            y0 + (y1 - y0) * frac,
            color,
        );
        t += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_has_axis_pixels_and_points() {
        let transform = PlotTransform::default();
        let points = vec![PhasorPoint {
            g: 0.5,
            s: 0.3,
            pixel_x: 0,
            pixel_y: 0,
        }];
        let img = render_snapshot(800, 600, &transform, &points);
        assert_eq!(img.dimensions(), (800, 600));
        // Bottom axis runs through world y = 400 at default identity view.
        assert_eq!(*img.get_pixel(300, 400), AXIS);
        // The point maps to (100 + 0.5*500, 400 - (0.3/0.6)*300) = (350, 250).
        assert_eq!(*img.get_pixel(350, 250), POINT);
    }

    #[test]
    fn out_of_frame_points_are_dropped() {
        let mut transform = PlotTransform::default();
        transform.translate(-10_000.0, 0.0);
        let points = vec![PhasorPoint {
            g: 0.5,
            s: 0.3,
            pixel_x: 0,
            pixel_y: 0,
        }];
        // Must not panic writing outside the buffer.
        let _ = render_snapshot(200, 200, &transform, &points);
    }
}
