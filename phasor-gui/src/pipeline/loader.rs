//! Image loading workers.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::{error, info};
use phasor_calib::PhasorCompute;
use phasor_core::ImageEntry;

use crate::message::AppMessage;

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Load an image stack, derive its phasor field and send back a ready
/// entry. Sends `LoadError` on any failure.
pub fn load_image_worker(
    path: PathBuf,
    compute: Arc<dyn PhasorCompute>,
    tx: Sender<AppMessage>,
) {
    thread::spawn(move || {
        let start = Instant::now();
        let name = file_label(&path);
        let _ = tx.send(AppMessage::LoadProgress(0.0, format!("Reading {name}")));

        let stack = match phasor_io::open_stack(&path) {
            Ok(stack) => stack,
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                let _ = tx.send(AppMessage::LoadError(format!("{name}: {err}")));
                return;
            }
        };

        let _ = tx.send(AppMessage::LoadProgress(0.5, format!("Deriving phasors for {name}")));

        let raw = match compute.derive_raw(&stack) {
            Ok(raw) => raw,
            Err(err) => {
                error!("phasor derivation failed for {}: {err}", path.display());
                let _ = tx.send(AppMessage::LoadError(format!("{name}: {err}")));
                return;
            }
        };

        let intensity = raw.mean().clone();
        let entry = match ImageEntry::new(intensity, Arc::new(raw)) {
            Ok(entry) => entry,
            Err(err) => {
                error!("entry construction failed for {}: {err}", path.display());
                let _ = tx.send(AppMessage::LoadError(format!("{name}: {err}")));
                return;
            }
        };

        info!("loaded {name} in {:.2?}", start.elapsed());
        let _ = tx.send(AppMessage::LoadComplete {
            entry: Box::new(entry),
            name,
            elapsed: start.elapsed(),
        });
    });
}

/// Load a calibration reference stack and send back its raw field.
pub fn load_calibration_worker(
    path: PathBuf,
    compute: Arc<dyn PhasorCompute>,
    tx: Sender<AppMessage>,
) {
    thread::spawn(move || {
        let name = file_label(&path);
        let _ = tx.send(AppMessage::LoadProgress(0.0, format!("Reading calibration {name}")));

        let raw = phasor_io::open_stack(&path)
            .map_err(|err| format!("{name}: {err}"))
            .and_then(|stack| {
                compute
                    .derive_raw(&stack)
                    .map_err(|err| format!("{name}: {err}"))
            });

        match raw {
            Ok(raw) => {
                info!("loaded calibration image {name}");
                let _ = tx.send(AppMessage::CalibImageLoaded(Arc::new(raw), name));
            }
            Err(err) => {
                error!("calibration load failed: {err}");
                let _ = tx.send(AppMessage::LoadError(err));
            }
        }
    });
}
