//! Flattened phasor point dataset and the elliptical selection query.

use ndarray::Zip;
use rayon::prelude::*;

use crate::field::ImageEntry;

/// One plotted phasor point linked back to its source pixel.
///
/// `pixel_x` is the column and `pixel_y` the row of the source pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasorPoint {
    pub g: f32,
    pub s: f32,
    pub pixel_x: u32,
    pub pixel_y: u32,
}

/// Holds every loaded image entry plus the flattened point list used for
/// plotting and spatial selection.
///
/// Points are rebuilt from the entries' current planes after a load or a
/// calibration pass; a pixel with both g and s equal to zero is the
/// "no data" sentinel and is never emitted.
#[derive(Debug, Default)]
pub struct PhasorDataset {
    entries: Vec<ImageEntry>,
    points: Vec<PhasorPoint>,
}

impl PhasorDataset {
    /// Append an entry and rebuild the point list.
    ///
    /// Entries are never removed; adding the same image twice appends a
    /// second, independent entry.
    pub fn add_entry(&mut self, entry: ImageEntry) -> usize {
        self.entries.push(entry);
        self.rebuild_points();
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut ImageEntry> {
        self.entries.get_mut(index)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current flattened point list.
    pub fn points(&self) -> &[PhasorPoint] {
        &self.points
    }

    /// Re-flatten every entry's current g/s planes into points.
    ///
    /// The g and s planes are walked in lock-step raster order, pairing
    /// each pixel's (g, s) with its (col, row) coordinate and skipping
    /// the (0, 0) sentinel.
    pub fn rebuild_points(&mut self) {
        self.points.clear();
        for entry in &self.entries {
            Zip::indexed(entry.current_g())
                .and(entry.current_s())
                .for_each(|(row, col), &g, &s| {
                    if g != 0.0 || s != 0.0 {
                        self.points.push(PhasorPoint {
                            g,
                            s,
                            pixel_x: index_to_u32(col),
                            pixel_y: index_to_u32(row),
                        });
                    }
                });
        }
    }

    /// Pixel coordinates of every point within the normalized ellipse
    /// `((g-cg)/rg)^2 + ((s-cs)/rs)^2 <= 1` (boundary inclusive).
    ///
    /// Full scan over the current points; parallelized so rapid cursor
    /// motion over large images stays interactive.
    pub fn points_in_ellipse(
        &self,
        center_g: f64,
        center_s: f64,
        radius_g: f64,
        radius_s: f64,
    ) -> Vec<(u32, u32)> {
        if !(radius_g > 0.0 && radius_s > 0.0) {
            return Vec::new();
        }
        self.points
            .par_iter()
            .filter(|p| {
                let dg = (f64::from(p.g) - center_g) / radius_g;
                let ds = (f64::from(p.s) - center_s) / radius_s;
                dg * dg + ds * ds <= 1.0
            })
            .map(|p| (p.pixel_x, p.pixel_y))
            .collect()
    }
}

// Plane dimensions never exceed u32 range in practice.
#[allow(clippy::cast_possible_truncation)]
fn index_to_u32(index: usize) -> u32 {
    index as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ImageEntry, RawField};
    use ndarray::array;
    use std::sync::Arc;

    fn entry_from_planes(g: ndarray::Array2<f32>, s: ndarray::Array2<f32>) -> ImageEntry {
        let mean = ndarray::Array2::<f32>::ones(g.dim());
        let raw = Arc::new(RawField::from_planes(mean.clone(), g, s).unwrap());
        ImageEntry::new(mean, raw).unwrap()
    }

    #[test]
    fn rebuild_skips_sentinel_points() {
        let g = array![[0.5, 0.0], [0.3, 0.6]];
        let s = array![[0.1, 0.0], [0.05, 0.2]];
        let mut dataset = PhasorDataset::default();
        dataset.add_entry(entry_from_planes(g, s));

        let points = dataset.points();
        assert_eq!(points.len(), 3);
        // (col, row) pairing in raster order; (0, 0) sentinel at row 0 col 1
        // is excluded.
        assert_eq!(
            points,
            &[
                PhasorPoint { g: 0.5, s: 0.1, pixel_x: 0, pixel_y: 0 },
                PhasorPoint { g: 0.3, s: 0.05, pixel_x: 0, pixel_y: 1 },
                PhasorPoint { g: 0.6, s: 0.2, pixel_x: 1, pixel_y: 1 },
            ]
        );
    }

    #[test]
    fn ellipse_query_is_boundary_inclusive() {
        // Coordinates exactly representable in f32 so the boundary point
        // sits at normalized distance 1.0 with no rounding.
        let g = array![[0.5, 0.75]];
        let s = array![[0.25, 0.25]];
        let mut dataset = PhasorDataset::default();
        dataset.add_entry(entry_from_planes(g, s));

        // (0.75, 0.25) sits exactly on the ellipse boundary: dg = 1.
        let hits = dataset.points_in_ellipse(0.5, 0.25, 0.25, 0.05);
        assert!(hits.contains(&(0, 0)));
        assert!(hits.contains(&(1, 0)));

        // Shrinking the g radius drops the boundary point.
        let hits = dataset.points_in_ellipse(0.5, 0.25, 0.2, 0.05);
        assert_eq!(hits, vec![(0, 0)]);
    }

    #[test]
    fn sentinel_never_selected() {
        let mut g = ndarray::Array2::<f32>::from_elem((20, 20), 0.4);
        let mut s = ndarray::Array2::<f32>::from_elem((20, 20), 0.2);
        g[[10, 10]] = 0.0;
        s[[10, 10]] = 0.0;
        let mut dataset = PhasorDataset::default();
        dataset.add_entry(entry_from_planes(g, s));

        // A huge ellipse centered on the origin still cannot catch the
        // sentinel pixel because it was never emitted as a point.
        let hits = dataset.points_in_ellipse(0.0, 0.0, 1e6, 1e6);
        assert!(!hits.contains(&(10, 10)));
        assert_eq!(hits.len(), 20 * 20 - 1);
    }

    #[test]
    fn degenerate_radii_select_nothing() {
        let g = array![[0.5]];
        let s = array![[0.2]];
        let mut dataset = PhasorDataset::default();
        dataset.add_entry(entry_from_planes(g, s));
        assert!(dataset.points_in_ellipse(0.5, 0.2, 0.0, 0.1).is_empty());
        assert!(dataset.points_in_ellipse(0.5, 0.2, -1.0, 0.1).is_empty());
    }

    #[test]
    fn points_span_all_entries() {
        let mut dataset = PhasorDataset::default();
        dataset.add_entry(entry_from_planes(array![[0.5]], array![[0.1]]));
        dataset.add_entry(entry_from_planes(array![[0.3]], array![[0.2]]));
        assert_eq!(dataset.points().len(), 2);
    }
}
