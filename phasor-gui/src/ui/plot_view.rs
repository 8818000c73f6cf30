//! Central phasor plot panel: pointer and key event mapping plus the
//! draw pass.

use eframe::egui::{self, PointerButton, Sense};

use crate::app::PhasorApp;
use crate::render::{overlay, plot};
use crate::state::Redraw;

pub fn show(ctx: &egui::Context, app: &mut PhasorApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let size = ui.available_size();
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;

        let to_canvas = |pos: egui::Pos2| {
            (f64::from(pos.x - rect.left()), f64::from(pos.y - rect.top()))
        };

        let mut redraw = Redraw::NONE;
        let mut merge = |r: Redraw| {
            redraw.plot |= r.plot;
            redraw.overlay |= r.overlay;
        };

        // Key bindings act on whichever plot is on screen, but never
        // steal keys from a focused text widget.
        let typing = ui.ctx().memory(|m| m.focused().is_some());
        if !typing {
            ui.input(|i| {
                if i.key_pressed(egui::Key::R) {
                    merge(app.interaction.reset_view());
                }
                if i.key_pressed(egui::Key::F) {
                    merge(
                        app.interaction
                            .fit_to_content(f64::from(rect.width()), f64::from(rect.height())),
                    );
                }
                if i.key_pressed(egui::Key::H) {
                    merge(app.interaction.toggle_overlay());
                }
                if i.key_pressed(egui::Key::Z) {
                    merge(app.interaction.toggle_zoom_box());
                }
                if i.key_pressed(egui::Key::C) {
                    merge(app.interaction.toggle_circle_cursor());
                }
            });
        }

        // Pointer events.
        if response.drag_started_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                merge(app.interaction.primary_pressed(x, y));
            }
        }
        if response.drag_started_by(PointerButton::Secondary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                merge(app.interaction.secondary_pressed(x, y));
            }
        }
        if response.dragged_by(PointerButton::Primary)
            || response.dragged_by(PointerButton::Secondary)
        {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                merge(app.interaction.pointer_dragged(x, y));
            }
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            merge(
                app.interaction
                    .primary_released(f64::from(rect.width()), f64::from(rect.height())),
            );
        }
        if response.drag_stopped_by(PointerButton::Secondary) {
            merge(app.interaction.secondary_released());
        }

        if let Some(pos) = response.hover_pos() {
            let (x, y) = to_canvas(pos);
            if !response.dragged() {
                merge(app.interaction.cursor_moved(x, y));
            }
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                merge(app.interaction.scroll(x, y, f64::from(scroll)));
            }
        } else if app.interaction.cursor.visible {
            merge(app.interaction.pointer_exited());
        }

        app.after_interaction(redraw);

        // Draw pass. The painter is clipped so pan and zoom never bleed
        // into neighboring panels.
        let painter = painter.with_clip_rect(rect);
        plot::draw_plot(&painter, rect, &app.interaction.transform, app.dataset.points());
        overlay::draw_overlay(&painter, rect, &app.interaction);
    });
}
