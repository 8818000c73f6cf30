//! The injected compute interface and the built-in manual backend.

use ndarray::{Array3, Zip};
use phasor_core::{Plane, RawField};

use crate::error::{ComputeError, Result};
use crate::state::CalibrationParams;

/// External phasor transform collaborator.
///
/// Implementations run on worker threads; they must not touch shared
/// mutable state. Manual and reference-derived calibration are variants
/// selected through [`CalibrationParams`], not through subclassing.
pub trait PhasorCompute: Send + Sync {
    /// Derive the raw phasor field from one image's signal stack
    /// (initial-load path). The result is canonical `[mean, g, s]`.
    fn derive_raw(&self, signal: &Array3<f32>) -> Result<RawField>;

    /// Re-derive calibrated (g, s) planes from a raw field under the
    /// given parameter snapshot.
    fn calibrate(&self, raw: &RawField, params: &CalibrationParams) -> Result<(Plane, Plane)>;
}

/// Built-in backend for manual calibration.
///
/// Applies the scalar phasor correction
/// `g' = m * (g*cos(phi) - s*sin(phi))`,
/// `s' = m * (g*sin(phi) + s*cos(phi))`,
/// which is the identity at `m = 1, phi = 0`. Reference-derived
/// calibration needs an external backend and is reported as unsupported
/// here. The (0, 0) "no data" sentinel maps to itself under any scalar
/// correction, so sentinel pixels survive recalibration unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualCompute;

impl PhasorCompute for ManualCompute {
    fn derive_raw(&self, signal: &Array3<f32>) -> Result<RawField> {
        // The signal stack is expected to already carry canonical
        // [mean, g, s] planes; validation happens in from_stack.
        Ok(RawField::from_stack(signal)?)
    }

    fn calibrate(&self, raw: &RawField, params: &CalibrationParams) -> Result<(Plane, Plane)> {
        match params {
            CalibrationParams::Manual {
                mod_factor,
                phase_shift,
            } => {
                #[allow(clippy::cast_possible_truncation)]
                let (m, cos_p, sin_p) = (
                    *mod_factor as f32,
                    phase_shift.cos() as f32,
                    phase_shift.sin() as f32,
                );
                let mut g_out = Plane::zeros(raw.shape());
                let mut s_out = Plane::zeros(raw.shape());
                Zip::from(&mut g_out)
                    .and(&mut s_out)
                    .and(raw.g())
                    .and(raw.s())
                    .for_each(|g_new, s_new, &g, &s| {
                        *g_new = m * (g * cos_p - s * sin_p);
                        *s_new = m * (g * sin_p + s * cos_p);
                    });
                Ok((g_out, s_out))
            }
            CalibrationParams::Reference { .. } => Err(ComputeError::Unsupported(
                "reference-derived calibration requires an external compute backend",
            )),
        }
    }
}
