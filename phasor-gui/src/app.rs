//! Main application: owns the dataset, calibration state, and the
//! interaction state machine, and drains worker messages each frame.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use eframe::egui;
use log::{info, warn};
use phasor_calib::{CalibrationMode, CalibrationState, ManualCompute, PhasorCompute};
use phasor_core::{PhasorDataset, Plane};

use crate::message::AppMessage;
use crate::pipeline;
use crate::state::{InteractionState, ProcessingState, Redraw, UiState};

pub struct PhasorApp {
    pub dataset: PhasorDataset,
    /// Display names, index-aligned with the dataset entries.
    pub entry_names: Vec<String>,
    pub calib: CalibrationState,
    pub interaction: InteractionState,
    pub processing: ProcessingState,
    pub ui_state: UiState,

    /// Pixels currently selected by the circle cursor, as (col, row).
    pub highlighted: Vec<(u32, u32)>,

    compute: Arc<dyn PhasorCompute>,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,

    /// Latest recompute generation; bumping it cancels the in-flight pass.
    recompute_generation: Arc<AtomicU64>,

    pub intensity_texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
}

impl Default for PhasorApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            dataset: PhasorDataset::default(),
            entry_names: Vec::new(),
            calib: CalibrationState::new(),
            interaction: InteractionState::new(),
            processing: ProcessingState::default(),
            ui_state: UiState::default(),
            highlighted: Vec::new(),
            compute: Arc::new(ManualCompute),
            tx,
            rx,
            recompute_generation: Arc::new(AtomicU64::new(0)),
            intensity_texture: None,
            texture_dirty: false,
        }
    }
}

impl PhasorApp {
    // ----- image loading -----

    /// Start loading an image stack. Unsupported paths are rejected
    /// before any worker is spawned.
    pub fn add_image(&mut self, path: PathBuf) {
        if !phasor_io::can_open(&path) {
            self.processing.status_text = format!("Unsupported file: {}", path.display());
            return;
        }
        self.processing.is_loading = true;
        self.processing.progress = 0.0;
        pipeline::load_image_worker(path, Arc::clone(&self.compute), self.tx.clone());
    }

    /// Start loading a calibration reference image.
    pub fn import_calibration_image(&mut self, path: PathBuf) {
        if !phasor_io::can_open(&path) {
            self.processing.status_text = format!("Unsupported file: {}", path.display());
            return;
        }
        self.ui_state.calib_file_label = "loading...".to_string();
        pipeline::load_calibration_worker(path, Arc::clone(&self.compute), self.tx.clone());
    }

    // ----- calibration edits -----

    pub fn set_calibration_mode(&mut self, mode: CalibrationMode) {
        if self.calib.mode() != mode {
            self.calib.set_mode(mode);
            self.dispatch_recompute();
        }
    }

    pub fn set_mod_factor(&mut self, value: f64) {
        if self.calib.set_mod_factor(value) {
            self.dispatch_recompute();
        }
    }

    pub fn set_phase_shift(&mut self, value: f64) {
        if self.calib.set_phase_shift(value) {
            self.dispatch_recompute();
        }
    }

    pub fn set_frequency(&mut self, value: f64) {
        if self.calib.set_frequency(value) {
            self.dispatch_recompute();
        }
    }

    pub fn set_calib_lifetime(&mut self, value: f64) {
        if self.calib.set_calib_lifetime(value) {
            self.dispatch_recompute();
        }
    }

    /// Start a recompute pass under the current parameters.
    ///
    /// Single flight: the generation bump cancels any in-flight pass and
    /// marks its eventual result stale.
    pub fn dispatch_recompute(&mut self) {
        if self.dataset.is_empty() {
            return;
        }
        let raws = self
            .dataset
            .entries()
            .iter()
            .map(|e| Arc::clone(e.raw()))
            .collect();
        let generation = pipeline::spawn_recompute(
            &self.recompute_generation,
            raws,
            self.calib.snapshot(),
            Arc::clone(&self.compute),
            self.tx.clone(),
        );
        self.processing.is_recomputing = true;
        self.processing.status_text = format!("Recalibrating (pass {generation})");
    }

    // ----- message handling -----

    /// Drain all pending worker messages.
    pub fn handle_messages(&mut self, ctx: &egui::Context) {
        let mut repaint = false;
        while let Ok(msg) = self.rx.try_recv() {
            self.apply_message(msg);
            repaint = true;
        }
        if repaint {
            ctx.request_repaint();
        }
    }

    /// Apply one worker message to the application state.
    pub fn apply_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::LoadProgress(progress, text) => {
                self.processing.progress = progress;
                self.processing.status_text = text;
            }
            AppMessage::LoadComplete { entry, name, elapsed } => {
                self.processing.is_loading = false;
                self.processing.progress = 1.0;
                self.processing.status_text = format!("Loaded {name} in {elapsed:.2?}");
                let index = self.dataset.add_entry(*entry);
                self.entry_names.push(name);
                self.ui_state.selected_entry = Some(index);
                self.texture_dirty = true;
                // Bring the new entry onto the current calibration.
                self.dispatch_recompute();
            }
            AppMessage::LoadError(err) => {
                self.processing.is_loading = false;
                self.processing.status_text = format!("Load failed: {err}");
                if self.ui_state.calib_file_label == "loading..." {
                    self.ui_state.calib_file_label.clear();
                }
            }
            AppMessage::CalibImageLoaded(field, name) => {
                self.ui_state.calib_file_label = name;
                self.calib.set_calib_image(field);
                self.dispatch_recompute();
            }
            AppMessage::RecomputeComplete { generation, planes, elapsed } => {
                self.apply_recompute(generation, planes, elapsed);
            }
        }
    }

    fn apply_recompute(
        &mut self,
        generation: u64,
        planes: Vec<Result<(Plane, Plane), String>>,
        elapsed: std::time::Duration,
    ) {
        if generation != self.recompute_generation.load(Ordering::SeqCst) {
            info!("discarding stale recompute generation {generation}");
            return;
        }
        self.processing.is_recomputing = false;

        let mut failures = 0usize;
        for (index, result) in planes.into_iter().enumerate() {
            match result {
                Ok((g, s)) => {
                    if let Some(entry) = self.dataset.entry_mut(index) {
                        if let Err(err) = entry.apply_calibrated(g, s) {
                            warn!("entry {index} rejected calibrated planes: {err}");
                            failures += 1;
                        }
                    }
                }
                Err(err) => {
                    // The entry keeps its previous planes.
                    warn!("entry {index} recompute failed: {err}");
                    failures += 1;
                }
            }
        }
        self.dataset.rebuild_points();
        self.highlighted.clear();
        self.processing.status_text = if failures == 0 {
            format!("Recalibrated {} images in {elapsed:.2?}", self.dataset.entry_count())
        } else {
            format!("Recalibration finished with {failures} failure(s)")
        };
    }

    // ----- selection -----

    /// Refresh the pixel highlight set from the circle cursor position.
    pub fn update_highlight(&mut self) {
        if !self.interaction.cursor_active() || self.dataset.is_empty() {
            self.highlighted.clear();
            return;
        }
        let cursor = self.interaction.cursor;
        let t = &self.interaction.transform;
        let (center_g, center_s) = t.screen_to_data(cursor.x, cursor.y);
        let (radius_g, radius_s) = t.cursor_radius_to_data(cursor.radius);
        self.highlighted = self
            .dataset
            .points_in_ellipse(center_g, center_s, radius_g, radius_s);
    }

    /// React to an interaction transition: view changes invalidate the
    /// selection, overlay changes only the highlight set.
    pub fn after_interaction(&mut self, redraw: Redraw) {
        if redraw.plot || redraw.overlay {
            self.update_highlight();
        }
    }

    // ----- snapshot -----

    /// Export the current plot view as a PNG.
    pub fn save_snapshot(&mut self, path: PathBuf, width: u32, height: u32) {
        match crate::render::snapshot::save_snapshot(
            &path,
            width,
            height,
            &self.interaction.transform,
            self.dataset.points(),
        ) {
            Ok(()) => {
                info!("saved snapshot to {}", path.display());
                self.processing.status_text = format!("Snapshot saved: {}", path.display());
            }
            Err(err) => {
                warn!("snapshot failed: {err}");
                self.processing.status_text = format!("Snapshot failed: {err}");
            }
        }
    }

    // ----- textures -----

    /// Rebuild the intensity texture if the selection or planes changed.
    pub fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty {
            return;
        }
        self.texture_dirty = false;
        let image = self.ui_state.selected_entry.and_then(|index| {
            self.dataset.entry(index).map(|entry| {
                crate::viewer::generate_intensity_image(entry.intensity(), self.ui_state.colormap)
            })
        });
        self.intensity_texture =
            image.map(|img| ctx.load_texture("intensity", img, egui::TextureOptions::NEAREST));
    }

    pub fn mark_texture_dirty(&mut self) {
        self.texture_dirty = true;
    }
}

impl eframe::App for PhasorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        crate::ui::theme::apply_system_theme(ctx);
        self.handle_messages(ctx);
        self.refresh_texture(ctx);

        crate::ui::control_panel::show(ctx, self);
        crate::ui::image_view::show(ctx, self);
        crate::ui::plot_view::show(ctx, self);

        if self.processing.busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Cancel any in-flight recompute before teardown.
        self.recompute_generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use phasor_core::{ImageEntry, RawField};
    use std::time::Duration;

    fn push_entry(app: &mut PhasorApp, g: Array2<f32>, s: Array2<f32>) {
        let mean = Array2::<f32>::ones(g.dim());
        let raw = Arc::new(RawField::from_planes(mean.clone(), g, s).unwrap());
        let entry = ImageEntry::new(mean, raw).unwrap();
        app.apply_message(AppMessage::LoadComplete {
            entry: Box::new(entry),
            name: "test.tif".to_string(),
            elapsed: Duration::ZERO,
        });
    }

    #[test]
    fn load_complete_appends_and_selects_entry() {
        let mut app = PhasorApp::default();
        push_entry(&mut app, array![[0.4]], array![[0.2]]);
        assert_eq!(app.dataset.entry_count(), 1);
        assert_eq!(app.entry_names, vec!["test.tif"]);
        assert_eq!(app.ui_state.selected_entry, Some(0));
        // Loading an entry schedules a recompute to apply current params.
        assert!(app.processing.is_recomputing);
    }

    #[test]
    fn stale_recompute_result_is_discarded() {
        let mut app = PhasorApp::default();
        push_entry(&mut app, array![[0.4]], array![[0.2]]);
        let current = app.recompute_generation.load(Ordering::SeqCst);

        let stale = vec![Ok((array![[9.0_f32]], array![[9.0_f32]]))];
        app.apply_message(AppMessage::RecomputeComplete {
            generation: current.wrapping_sub(1),
            planes: stale,
            elapsed: Duration::ZERO,
        });
        let entry = app.dataset.entry(0).unwrap();
        assert_eq!(entry.current_g()[[0, 0]], 0.4);

        let fresh = vec![Ok((array![[0.8_f32]], array![[0.4_f32]]))];
        app.apply_message(AppMessage::RecomputeComplete {
            generation: current,
            planes: fresh,
            elapsed: Duration::ZERO,
        });
        let entry = app.dataset.entry(0).unwrap();
        assert_eq!(entry.current_g()[[0, 0]], 0.8);
        assert!(!app.processing.is_recomputing);
    }

    #[test]
    fn failed_entry_keeps_previous_planes() {
        let mut app = PhasorApp::default();
        push_entry(&mut app, array![[0.4]], array![[0.2]]);
        push_entry(&mut app, array![[0.3]], array![[0.1]]);
        let current = app.recompute_generation.load(Ordering::SeqCst);

        let planes = vec![
            Ok((array![[0.2_f32]], array![[0.1_f32]])),
            Err("boom".to_string()),
        ];
        app.apply_message(AppMessage::RecomputeComplete {
            generation: current,
            planes,
            elapsed: Duration::ZERO,
        });
        assert_eq!(app.dataset.entry(0).unwrap().current_g()[[0, 0]], 0.2);
        assert_eq!(app.dataset.entry(1).unwrap().current_g()[[0, 0]], 0.3);
        // Points reflect the mixed outcome.
        assert_eq!(app.dataset.points().len(), 2);
    }

    #[test]
    fn rejected_parameter_edits_do_not_dispatch() {
        let mut app = PhasorApp::default();
        push_entry(&mut app, array![[0.4]], array![[0.2]]);
        app.processing.is_recomputing = false;
        let before = app.recompute_generation.load(Ordering::SeqCst);

        app.set_frequency(f64::NAN);
        app.set_calib_lifetime(-1.0);
        app.set_mod_factor(0.0);
        app.set_phase_shift(f64::NAN);

        assert_eq!(app.recompute_generation.load(Ordering::SeqCst), before);
        assert!(!app.processing.is_recomputing);
    }

    #[test]
    fn load_error_clears_loading_state() {
        let mut app = PhasorApp::default();
        app.processing.is_loading = true;
        app.apply_message(AppMessage::LoadError("bad file".to_string()));
        assert!(!app.processing.is_loading);
        assert!(app.processing.status_text.contains("bad file"));
    }

    #[test]
    fn highlight_follows_cursor_over_points() {
        let mut app = PhasorApp::default();
        push_entry(&mut app, array![[0.5]], array![[0.3]]);
        // Data (0.5, 0.3) maps to screen (350, 250) at the default view.
        app.interaction.cursor_moved(350.0, 250.0);
        app.update_highlight();
        assert_eq!(app.highlighted, vec![(0, 0)]);

        app.interaction.cursor_moved(100.0, 400.0);
        app.update_highlight();
        assert!(app.highlighted.is_empty());
    }
}
