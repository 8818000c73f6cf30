//! Calibration mode, live state, and dispatch-time parameter snapshots.

use std::f64::consts::PI;
use std::sync::Arc;

use phasor_core::RawField;

/// The active calibration strategy. Exactly one is in effect at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationMode {
    /// Scalar modulation-factor / phase-shift correction.
    #[default]
    Manual,
    /// Correction derived from an imported reference image.
    AutoImage,
    /// Correction derived from a reference curve measurement.
    AutoCurve,
}

impl std::fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationMode::Manual => write!(f, "Manual"),
            CalibrationMode::AutoImage => write!(f, "Calibration image"),
            CalibrationMode::AutoCurve => write!(f, "Calibration curve"),
        }
    }
}

/// Immutable parameter snapshot captured at recompute dispatch.
///
/// The worker only ever sees a snapshot, never the live state, so a
/// parameter edit mid-pass cannot leak into an in-flight computation.
#[derive(Debug, Clone)]
pub enum CalibrationParams {
    Manual {
        mod_factor: f64,
        phase_shift: f64,
    },
    Reference {
        calib_image: Arc<RawField>,
        frequency: f64,
        lifetime: f64,
    },
}

/// Live calibration state, owned by the interaction thread.
///
/// Mode switching is mutually exclusive by construction (a single enum
/// field); editing a manual parameter forces `Manual`, assigning a
/// calibration image forces `AutoImage`.
#[derive(Debug, Clone)]
pub struct CalibrationState {
    mode: CalibrationMode,
    mod_factor: f64,
    phase_shift: f64,
    calib_image: Option<Arc<RawField>>,
    frequency: f64,
    calib_lifetime: f64,
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationState {
    pub fn new() -> Self {
        Self {
            mode: CalibrationMode::Manual,
            mod_factor: 1.0,
            phase_shift: 0.0,
            calib_image: None,
            frequency: 0.0,
            calib_lifetime: 0.0,
        }
    }

    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CalibrationMode) {
        self.mode = mode;
    }

    pub fn mod_factor(&self) -> f64 {
        self.mod_factor
    }

    /// Set the modulation factor; forces manual mode. Non-finite or
    /// non-positive values are rejected. Returns whether anything changed.
    pub fn set_mod_factor(&mut self, value: f64) -> bool {
        if !value.is_finite() || value <= 0.0 {
            return false;
        }
        self.mod_factor = value;
        self.mode = CalibrationMode::Manual;
        true
    }

    pub fn phase_shift(&self) -> f64 {
        self.phase_shift
    }

    /// Set the phase shift, clamped to [-pi, pi]; forces manual mode.
    pub fn set_phase_shift(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.phase_shift = value.clamp(-PI, PI);
        self.mode = CalibrationMode::Manual;
        true
    }

    pub fn calib_image(&self) -> Option<&Arc<RawField>> {
        self.calib_image.as_ref()
    }

    /// Assign a reference image; forces auto-image mode.
    pub fn set_calib_image(&mut self, field: Arc<RawField>) {
        self.calib_image = Some(field);
        self.mode = CalibrationMode::AutoImage;
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Set the laser repetition frequency; negative or non-finite
    /// values are rejected. Returns whether the value was accepted.
    pub fn set_frequency(&mut self, value: f64) -> bool {
        if value.is_finite() && value >= 0.0 {
            self.frequency = value;
            return true;
        }
        false
    }

    pub fn calib_lifetime(&self) -> f64 {
        self.calib_lifetime
    }

    /// Set the reference lifetime; negative or non-finite values are
    /// rejected. Returns whether the value was accepted.
    pub fn set_calib_lifetime(&mut self, value: f64) -> bool {
        if value.is_finite() && value >= 0.0 {
            self.calib_lifetime = value;
            return true;
        }
        false
    }

    /// Whether the manual controls (mod factor, phase shift) are active.
    pub fn manual_controls_enabled(&self) -> bool {
        self.mode == CalibrationMode::Manual
    }

    /// Whether the calibration-source controls (import, lifetime,
    /// frequency) are active.
    pub fn source_controls_enabled(&self) -> bool {
        self.mode != CalibrationMode::Manual
    }

    /// Capture the parameters for one recompute dispatch.
    ///
    /// An auto mode without an assigned reference image falls back to the
    /// manual parameters, matching the pre-import behavior of the
    /// calibration panel.
    pub fn snapshot(&self) -> CalibrationParams {
        match (self.mode, &self.calib_image) {
            (CalibrationMode::AutoImage | CalibrationMode::AutoCurve, Some(image)) => {
                CalibrationParams::Reference {
                    calib_image: Arc::clone(image),
                    frequency: self.frequency,
                    lifetime: self.calib_lifetime,
                }
            }
            _ => CalibrationParams::Manual {
                mod_factor: self.mod_factor,
                phase_shift: self.phase_shift,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use phasor_core::RawField;

    fn some_field() -> Arc<RawField> {
        Arc::new(RawField::from_stack(&Array3::zeros((2, 2, 3))).unwrap())
    }

    #[test]
    fn exactly_one_mode_active() {
        let mut state = CalibrationState::new();
        state.set_mode(CalibrationMode::AutoCurve);
        assert_eq!(state.mode(), CalibrationMode::AutoCurve);
        state.set_mode(CalibrationMode::AutoImage);
        assert_eq!(state.mode(), CalibrationMode::AutoImage);
        assert!(!state.manual_controls_enabled());
        assert!(state.source_controls_enabled());
    }

    #[test]
    fn manual_edit_forces_manual_mode() {
        let mut state = CalibrationState::new();
        state.set_mode(CalibrationMode::AutoImage);
        assert!(state.set_mod_factor(0.8));
        assert_eq!(state.mode(), CalibrationMode::Manual);
        assert!(state.manual_controls_enabled());
        assert!(!state.source_controls_enabled());
    }

    #[test]
    fn phase_shift_is_clamped() {
        let mut state = CalibrationState::new();
        assert!(state.set_phase_shift(10.0));
        assert!((state.phase_shift() - PI).abs() < 1e-12);
        assert!(!state.set_phase_shift(f64::NAN));
    }

    #[test]
    fn assigning_image_forces_auto_image() {
        let mut state = CalibrationState::new();
        state.set_calib_image(some_field());
        assert_eq!(state.mode(), CalibrationMode::AutoImage);
    }

    #[test]
    fn snapshot_matches_mode() {
        let mut state = CalibrationState::new();
        state.set_mod_factor(0.9);
        match state.snapshot() {
            CalibrationParams::Manual { mod_factor, .. } => {
                assert!((mod_factor - 0.9).abs() < 1e-12);
            }
            CalibrationParams::Reference { .. } => panic!("expected manual snapshot"),
        }

        state.set_calib_image(some_field());
        state.set_frequency(80.0);
        match state.snapshot() {
            CalibrationParams::Reference { frequency, .. } => {
                assert!((frequency - 80.0).abs() < 1e-12);
            }
            CalibrationParams::Manual { .. } => panic!("expected reference snapshot"),
        }
    }

    #[test]
    fn rejected_source_values_report_no_change() {
        let mut state = CalibrationState::new();
        assert!(state.set_frequency(80.0));
        assert!(!state.set_frequency(f64::NAN));
        assert!(!state.set_frequency(-5.0));
        assert!((state.frequency() - 80.0).abs() < 1e-12);

        assert!(state.set_calib_lifetime(4.0));
        assert!(!state.set_calib_lifetime(f64::INFINITY));
        assert!((state.calib_lifetime() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn auto_mode_without_image_falls_back_to_manual() {
        let mut state = CalibrationState::new();
        state.set_mode(CalibrationMode::AutoImage);
        assert!(matches!(
            state.snapshot(),
            CalibrationParams::Manual { .. }
        ));
    }
}
