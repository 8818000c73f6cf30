//! Right panel: intensity image of the selected entry with the pixels
//! picked out by the circle cursor drawn in red.

use eframe::egui;

use crate::app::PhasorApp;
use crate::render::plot::draw_pixel_highlights;

pub fn show(ctx: &egui::Context, app: &mut PhasorApp) {
    egui::SidePanel::right("image_view")
        .default_width(320.0)
        .show(ctx, |ui| {
            let Some(index) = app.ui_state.selected_entry else {
                ui.weak("No image selected");
                return;
            };
            let Some(entry) = app.dataset.entry(index) else {
                return;
            };
            let (rows, cols) = entry.shape();

            let Some(texture) = app.intensity_texture.as_ref() else {
                ui.weak("Building preview...");
                return;
            };

            // Fit the image into the panel width, preserving aspect.
            let avail = ui.available_width();
            let aspect = crate::util::usize_to_f32(rows) / crate::util::usize_to_f32(cols);
            let size = egui::vec2(avail, avail * aspect);
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            draw_pixel_highlights(ui.painter(), rect, (rows, cols), &app.highlighted);

            ui.weak(format!("{cols} x {rows} px, {} selected", app.highlighted.len()));
        });
}
