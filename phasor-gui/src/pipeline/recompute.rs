//! Single-flight recompute dispatch.
//!
//! Each dispatch bumps the shared generation counter and tags its result
//! with the value it was started under. A later dispatch bumps the
//! counter again, which both cancels the in-flight pass between entries
//! and marks its eventual result stale so the UI thread discards it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::{debug, info};
use phasor_calib::{recompute_entries, CalibrationParams, PhasorCompute, RecomputeOptions};
use phasor_core::RawField;

use crate::message::AppMessage;

/// Start a recompute pass over a snapshot of the dataset's raw fields.
///
/// Returns the generation the pass runs under.
pub fn spawn_recompute(
    latest: &Arc<AtomicU64>,
    raws: Vec<Arc<RawField>>,
    params: CalibrationParams,
    compute: Arc<dyn PhasorCompute>,
    tx: Sender<AppMessage>,
) -> u64 {
    let generation = latest.fetch_add(1, Ordering::SeqCst) + 1;
    let latest = Arc::clone(latest);
    debug!("dispatching recompute generation {generation} over {} entries", raws.len());

    thread::spawn(move || {
        let start = Instant::now();
        let cancel = || latest.load(Ordering::SeqCst) != generation;
        let results = recompute_entries(
            &raws,
            &params,
            compute.as_ref(),
            cancel,
            &RecomputeOptions::default(),
        );
        let planes = results
            .into_iter()
            .map(|r| r.map_err(|e| e.to_string()))
            .collect();
        info!("recompute generation {generation} finished in {:.2?}", start.elapsed());
        let _ = tx.send(AppMessage::RecomputeComplete {
            generation,
            planes,
            elapsed: start.elapsed(),
        });
    });

    generation
}
