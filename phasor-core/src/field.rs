//! Phasor plane stacks and per-image entries.

use std::sync::Arc;

use ndarray::{Array2, Array3, Axis};

use crate::error::{Error, Result};

/// A single per-pixel scalar plane, indexed (row, col).
pub type Plane = Array2<f32>;

/// Uncalibrated phasor planes derived from one image's signal stack.
///
/// Plane order along the stack axis is canonically `[mean, g, s]`; both
/// the initial-load path and the recalibration path must build fields
/// through [`RawField::from_stack`] so the ordering is validated in one
/// place. A `RawField` never changes after construction.
#[derive(Debug, Clone)]
pub struct RawField {
    mean: Plane,
    g: Plane,
    s: Plane,
}

impl RawField {
    /// Number of planes in a canonical phasor stack.
    pub const PLANE_COUNT: usize = 3;

    /// Build a field from a `(rows, cols, planes)` stack in canonical
    /// `[mean, g, s]` order.
    pub fn from_stack(stack: &Array3<f32>) -> Result<Self> {
        let planes = stack.len_of(Axis(2));
        if planes != Self::PLANE_COUNT {
            return Err(Error::PlaneCount {
                expected: Self::PLANE_COUNT,
                got: planes,
            });
        }
        if stack.len_of(Axis(0)) == 0 || stack.len_of(Axis(1)) == 0 {
            return Err(Error::EmptyStack);
        }
        Ok(Self {
            mean: stack.index_axis(Axis(2), 0).to_owned(),
            g: stack.index_axis(Axis(2), 1).to_owned(),
            s: stack.index_axis(Axis(2), 2).to_owned(),
        })
    }

    /// Build a field from three separate planes of identical shape.
    pub fn from_planes(mean: Plane, g: Plane, s: Plane) -> Result<Self> {
        check_shape(mean.dim(), g.dim())?;
        check_shape(mean.dim(), s.dim())?;
        if mean.is_empty() {
            return Err(Error::EmptyStack);
        }
        Ok(Self { mean, g, s })
    }

    /// Mean intensity plane.
    pub fn mean(&self) -> &Plane {
        &self.mean
    }

    /// Uncalibrated g plane.
    pub fn g(&self) -> &Plane {
        &self.g
    }

    /// Uncalibrated s plane.
    pub fn s(&self) -> &Plane {
        &self.s
    }

    /// Plane shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.mean.dim()
    }
}

/// One loaded image with its raw phasor field and the current calibrated
/// g/s planes.
///
/// `raw` is immutable for the life of the entry; `current_g`/`current_s`
/// are overwritten in place whenever a calibration pass completes.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    intensity: Plane,
    raw: Arc<RawField>,
    current_g: Plane,
    current_s: Plane,
}

impl ImageEntry {
    /// Create an entry; the current planes start as the raw g/s planes.
    pub fn new(intensity: Plane, raw: Arc<RawField>) -> Result<Self> {
        check_shape(raw.shape(), intensity.dim())?;
        let current_g = raw.g().clone();
        let current_s = raw.s().clone();
        Ok(Self {
            intensity,
            raw,
            current_g,
            current_s,
        })
    }

    /// Companion intensity image for pixel highlighting.
    pub fn intensity(&self) -> &Plane {
        &self.intensity
    }

    /// The immutable raw phasor field.
    pub fn raw(&self) -> &Arc<RawField> {
        &self.raw
    }

    /// Current calibrated g plane.
    pub fn current_g(&self) -> &Plane {
        &self.current_g
    }

    /// Current calibrated s plane.
    pub fn current_s(&self) -> &Plane {
        &self.current_s
    }

    /// Overwrite the current planes with freshly calibrated ones.
    ///
    /// Rejects planes whose shape does not match the entry; the prior
    /// planes are retained in that case.
    pub fn apply_calibrated(&mut self, g: Plane, s: Plane) -> Result<()> {
        check_shape(self.raw.shape(), g.dim())?;
        check_shape(self.raw.shape(), s.dim())?;
        self.current_g = g;
        self.current_s = s;
        Ok(())
    }

    /// Plane shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.raw.shape()
    }
}

fn check_shape(expected: (usize, usize), got: (usize, usize)) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::PlaneShape {
            expected_rows: expected.0,
            expected_cols: expected.1,
            rows: got.0,
            cols: got.1,
        })
    }
}
