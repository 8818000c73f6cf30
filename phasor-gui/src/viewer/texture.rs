//! Texture generation for the intensity image.

use egui::ColorImage;
use phasor_core::Plane;

use crate::viewer::Colormap;

/// Generate a false-color image from an intensity plane.
///
/// Values are max-normalized with a square-root stretch so dim structure
/// stays visible next to bright pixels.
#[must_use]
pub fn generate_intensity_image(plane: &Plane, colormap: Colormap) -> ColorImage {
    let (rows, cols) = plane.dim();
    let max = plane.iter().copied().fold(0.0_f32, f32::max).max(1e-12);

    let mut pixels = vec![0u8; rows * cols * 4];
    for ((row, col), &value) in plane.indexed_iter() {
        let val = (value / max).clamp(0.0, 1.0).sqrt();
        let rgba = colormap.apply(val);
        let offset = (row * cols + col) * 4;
        pixels[offset..offset + 4].copy_from_slice(&rgba);
    }

    ColorImage::from_rgba_unmultiplied([cols, rows], &pixels)
}
