//! End-to-end calibration pass over a small dataset.

use std::sync::Arc;

use approx::assert_relative_eq;
use ndarray::array;
use phasor_calib::{
    recompute_entries, CalibrationMode, CalibrationState, ManualCompute, RecomputeOptions,
};
use phasor_core::{ImageEntry, PhasorDataset, RawField};

fn build_dataset() -> PhasorDataset {
    let mut dataset = PhasorDataset::default();
    for (g, s) in [(0.4_f32, 0.2_f32), (0.6, 0.1)] {
        let raw = Arc::new(
            RawField::from_planes(array![[1.0]], array![[g]], array![[s]]).unwrap(),
        );
        let entry = ImageEntry::new(array![[1.0]], raw).unwrap();
        dataset.add_entry(entry);
    }
    dataset
}

#[test]
fn manual_edit_recalibrates_every_entry() {
    let mut dataset = build_dataset();
    let mut state = CalibrationState::new();
    assert!(state.set_mod_factor(0.5));

    let params = state.snapshot();
    let raws: Vec<_> = dataset.entries().iter().map(|e| Arc::clone(e.raw())).collect();
    let results = recompute_entries(
        &raws,
        &params,
        &ManualCompute,
        || false,
        &RecomputeOptions::default(),
    );
    assert_eq!(results.len(), dataset.entry_count());

    for (index, result) in results.into_iter().enumerate() {
        let (g, s) = result.unwrap();
        dataset.entry_mut(index).unwrap().apply_calibrated(g, s).unwrap();
    }
    dataset.rebuild_points();

    let points = dataset.points();
    assert_eq!(points.len(), 2);
    assert_relative_eq!(points[0].g, 0.2);
    assert_relative_eq!(points[0].s, 0.1);
    assert_relative_eq!(points[1].g, 0.3);
    assert_relative_eq!(points[1].s, 0.05);
}

#[test]
fn switching_auto_modes_keeps_one_mode_active() {
    let mut state = CalibrationState::new();
    state.set_mode(CalibrationMode::AutoCurve);
    state.set_mode(CalibrationMode::AutoImage);
    assert_eq!(state.mode(), CalibrationMode::AutoImage);
    assert!(!state.manual_controls_enabled());
    assert!(state.source_controls_enabled());
}

#[test]
fn identity_parameters_leave_the_dataset_unchanged() {
    let mut dataset = build_dataset();
    let state = CalibrationState::new();

    let raws: Vec<_> = dataset.entries().iter().map(|e| Arc::clone(e.raw())).collect();
    let results = recompute_entries(
        &raws,
        &state.snapshot(),
        &ManualCompute,
        || false,
        &RecomputeOptions::default(),
    );
    for (index, result) in results.into_iter().enumerate() {
        let (g, s) = result.unwrap();
        dataset.entry_mut(index).unwrap().apply_calibrated(g, s).unwrap();
    }
    dataset.rebuild_points();

    assert_relative_eq!(dataset.points()[0].g, 0.4);
    assert_relative_eq!(dataset.points()[0].s, 0.2);
}
