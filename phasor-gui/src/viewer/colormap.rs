//! Colormap definitions for intensity false-coloring.

use crate::util::f32_to_u8;

/// Available colormaps for the intensity image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Grayscale - black to white.
    Grayscale,
    /// Green - black to bright green.
    Green,
    /// Hot (Thermal) - red to yellow to white.
    Hot,
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Colormap::Grayscale => write!(f, "Grayscale"),
            Colormap::Green => write!(f, "Green"),
            Colormap::Hot => write!(f, "Hot (Thermal)"),
        }
    }
}

impl Colormap {
    /// Apply the colormap to a normalized value [0, 1] and return RGBA
    /// bytes. Pure: the renderer passes the value in, nothing else.
    #[must_use]
    pub fn apply(self, val: f32) -> [u8; 4] {
        match self {
            Colormap::Grayscale => {
                let v = f32_to_u8(val * 255.0);
                [v, v, v, 255]
            }
            Colormap::Green => {
                let v = f32_to_u8(val * 255.0);
                [0, v, 0, 255]
            }
            Colormap::Hot => {
                if val < 0.5 {
                    let g = f32_to_u8(val * 2.0 * 255.0);
                    [255, g, 0, 255]
                } else {
                    let b = f32_to_u8((val - 0.5) * 2.0 * 255.0);
                    [255, 255, b, 255]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_endpoints() {
        assert_eq!(Colormap::Grayscale.apply(0.0), [0, 0, 0, 255]);
        assert_eq!(Colormap::Grayscale.apply(1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn values_are_clamped() {
        assert_eq!(Colormap::Green.apply(2.0), [0, 255, 0, 255]);
        assert_eq!(Colormap::Green.apply(-1.0), [0, 0, 0, 255]);
    }
}
