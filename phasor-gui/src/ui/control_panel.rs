//! Control panel (left sidebar): image list, calibration controls,
//! snapshot export, and the status bar.

use eframe::egui;
use rfd::FileDialog;

use super::theme::{form_label, primary_button, section_header};
use crate::app::PhasorApp;
use crate::viewer::Colormap;
use phasor_calib::CalibrationMode;
use phasor_io::SUPPORTED_EXTENSIONS;

pub fn show(ctx: &egui::Context, app: &mut PhasorApp) {
    egui::SidePanel::left("control_panel")
        .default_width(260.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                image_section(ui, app);
                ui.separator();
                calibration_section(ui, app);
                ui.separator();
                display_section(ui, app);
            });
        });

    status_bar(ctx, app);
}

fn image_section(ui: &mut egui::Ui, app: &mut PhasorApp) {
    ui.label(section_header("Images"));

    let can_load = !app.processing.is_loading;
    if ui
        .add_enabled(can_load, primary_button("Add image"))
        .clicked()
    {
        if let Some(path) = FileDialog::new()
            .add_filter("TIFF stack", SUPPORTED_EXTENSIONS)
            .pick_file()
        {
            app.add_image(path);
        }
    }

    if app.entry_names.is_empty() {
        ui.weak("No images loaded");
        return;
    }

    let mut clicked = None;
    for (index, name) in app.entry_names.iter().enumerate() {
        let selected = app.ui_state.selected_entry == Some(index);
        if ui.selectable_label(selected, name).clicked() {
            clicked = Some(index);
        }
    }
    if let Some(index) = clicked {
        app.ui_state.selected_entry = Some(index);
        app.mark_texture_dirty();
    }
}

fn calibration_section(ui: &mut egui::Ui, app: &mut PhasorApp) {
    ui.label(section_header("Calibration"));

    let mut mode = app.calib.mode();
    let mut changed = false;
    for candidate in [
        CalibrationMode::Manual,
        CalibrationMode::AutoImage,
        CalibrationMode::AutoCurve,
    ] {
        changed |= ui
            .radio_value(&mut mode, candidate, candidate.to_string())
            .changed();
    }
    if changed {
        app.set_calibration_mode(mode);
    }

    // Manual scalar correction.
    ui.add_enabled_ui(app.calib.manual_controls_enabled(), |ui| {
        ui.label(form_label("Modulation factor"));
        let mut mod_factor = app.calib.mod_factor();
        if ui
            .add(
                egui::DragValue::new(&mut mod_factor)
                    .speed(0.01)
                    .range(0.01..=10.0),
            )
            .changed()
        {
            app.set_mod_factor(mod_factor);
        }

        ui.label(form_label("Phase shift (rad)"));
        let mut phase = app.calib.phase_shift();
        if ui
            .add(
                egui::DragValue::new(&mut phase)
                    .speed(0.01)
                    .range(-std::f64::consts::PI..=std::f64::consts::PI),
            )
            .changed()
        {
            app.set_phase_shift(phase);
        }
    });

    // Reference-derived correction.
    ui.add_enabled_ui(app.calib.source_controls_enabled(), |ui| {
        if ui.button("Import calibration image").clicked() {
            if let Some(path) = FileDialog::new()
                .add_filter("TIFF stack", SUPPORTED_EXTENSIONS)
                .pick_file()
            {
                app.import_calibration_image(path);
            }
        }
        if !app.ui_state.calib_file_label.is_empty() {
            ui.weak(app.ui_state.calib_file_label.clone());
        }

        ui.label(form_label("Frequency (MHz)"));
        let mut frequency = app.calib.frequency();
        if ui
            .add(egui::DragValue::new(&mut frequency).speed(1.0).range(0.0..=10_000.0))
            .changed()
        {
            app.set_frequency(frequency);
        }

        ui.label(form_label("Reference lifetime (ns)"));
        let mut lifetime = app.calib.calib_lifetime();
        if ui
            .add(egui::DragValue::new(&mut lifetime).speed(0.1).range(0.0..=1_000.0))
            .changed()
        {
            app.set_calib_lifetime(lifetime);
        }
    });
}

fn display_section(ui: &mut egui::Ui, app: &mut PhasorApp) {
    ui.label(section_header("Display"));

    egui::ComboBox::from_label("Colormap")
        .selected_text(app.ui_state.colormap.to_string())
        .show_ui(ui, |ui| {
            for cm in [Colormap::Grayscale, Colormap::Green, Colormap::Hot] {
                if ui
                    .selectable_value(&mut app.ui_state.colormap, cm, cm.to_string())
                    .changed()
                {
                    app.mark_texture_dirty();
                }
            }
        });

    if ui.button("Save plot snapshot").clicked() {
        if let Some(path) = FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("phasor-plot.png")
            .save_file()
        {
            app.save_snapshot(path, 1200, 900);
        }
    }
}

fn status_bar(ctx: &egui::Context, app: &PhasorApp) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if app.processing.busy() {
                ui.spinner();
                if app.processing.is_loading {
                    ui.add(
                        egui::ProgressBar::new(app.processing.progress)
                            .desired_width(120.0),
                    );
                }
            }
            ui.label(&app.processing.status_text);
        });
    });
}
