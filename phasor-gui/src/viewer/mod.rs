//! Visualization modules for the intensity image.

mod colormap;
mod texture;

pub use colormap::Colormap;
pub use texture::generate_intensity_image;
