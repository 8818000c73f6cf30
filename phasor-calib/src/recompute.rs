//! The full recompute pass over every image entry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::warn;
use phasor_core::{Plane, RawField};

use crate::compute::PhasorCompute;
use crate::error::{ComputeError, Result};
use crate::state::CalibrationParams;

/// Options for one recompute pass.
#[derive(Debug, Clone, Copy)]
pub struct RecomputeOptions {
    /// Wall-clock bound for the whole pass. Entries not started before
    /// the deadline are reported as timed out; a synchronous compute call
    /// cannot be preempted mid-entry, so the bound applies between
    /// entries.
    pub timeout: Option<Duration>,
}

impl Default for RecomputeOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Run the calibration transform over every entry's raw field.
///
/// Calibration parameters are process-wide, so every entry is attempted
/// on any parameter change. One entry failing does not abort the pass;
/// its error is recorded and the remaining entries still run. `cancel`
/// is polled between entries; a superseding parameter change stops the
/// pass early, marking the untouched entries cancelled.
pub fn recompute_entries(
    raws: &[Arc<RawField>],
    params: &CalibrationParams,
    compute: &dyn PhasorCompute,
    cancel: impl Fn() -> bool,
    options: &RecomputeOptions,
) -> Vec<Result<(Plane, Plane)>> {
    let started = Instant::now();
    let mut results = Vec::with_capacity(raws.len());

    for (index, raw) in raws.iter().enumerate() {
        if cancel() {
            warn!("recompute cancelled after {index}/{} entries", raws.len());
            results.push(Err(ComputeError::Cancelled));
            continue;
        }
        if let Some(timeout) = options.timeout {
            if started.elapsed() >= timeout {
                warn!("recompute deadline hit after {index}/{} entries", raws.len());
                results.push(Err(ComputeError::TimedOut));
                continue;
            }
        }
        results.push(compute.calibrate(raw, params));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ManualCompute;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCompute {
        calls: AtomicUsize,
        fail_index: Option<usize>,
    }

    impl PhasorCompute for CountingCompute {
        fn derive_raw(&self, signal: &ndarray::Array3<f32>) -> Result<RawField> {
            Ok(RawField::from_stack(signal)?)
        }

        fn calibrate(
            &self,
            raw: &RawField,
            params: &CalibrationParams,
        ) -> Result<(Plane, Plane)> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(call) == self.fail_index {
                return Err(ComputeError::Failed("injected".into()));
            }
            ManualCompute.calibrate(raw, params)
        }
    }

    fn raws(n: usize) -> Vec<Arc<RawField>> {
        (0..n)
            .map(|_| {
                Arc::new(
                    RawField::from_planes(array![[1.0]], array![[0.4]], array![[0.2]]).unwrap(),
                )
            })
            .collect()
    }

    fn manual_params() -> CalibrationParams {
        CalibrationParams::Manual {
            mod_factor: 1.0,
            phase_shift: 0.0,
        }
    }

    #[test]
    fn every_entry_is_recomputed() {
        let compute = CountingCompute {
            calls: AtomicUsize::new(0),
            fail_index: None,
        };
        let results = recompute_entries(
            &raws(4),
            &manual_params(),
            &compute,
            || false,
            &RecomputeOptions::default(),
        );
        assert_eq!(results.len(), 4);
        assert_eq!(compute.calls.load(Ordering::SeqCst), 4);
        assert!(results.iter().all(Result::is_ok));
    }

    #[test]
    fn one_failure_does_not_abort_the_pass() {
        let compute = CountingCompute {
            calls: AtomicUsize::new(0),
            fail_index: Some(1),
        };
        let results = recompute_entries(
            &raws(3),
            &manual_params(),
            &compute,
            || false,
            &RecomputeOptions::default(),
        );
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ComputeError::Failed(_))));
        assert!(results[2].is_ok());
    }

    #[test]
    fn cancellation_skips_remaining_entries() {
        let compute = CountingCompute {
            calls: AtomicUsize::new(0),
            fail_index: None,
        };
        let calls = &compute.calls;
        let results = recompute_entries(
            &raws(5),
            &manual_params(),
            &compute,
            || calls.load(Ordering::SeqCst) >= 2,
            &RecomputeOptions::default(),
        );
        assert_eq!(results.len(), 5);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2..]
            .iter()
            .all(|r| matches!(r, Err(ComputeError::Cancelled))));
    }

    #[test]
    fn expired_deadline_marks_entries_timed_out() {
        let compute = CountingCompute {
            calls: AtomicUsize::new(0),
            fail_index: None,
        };
        let options = RecomputeOptions {
            timeout: Some(Duration::ZERO),
        };
        let results = recompute_entries(&raws(2), &manual_params(), &compute, || false, &options);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(ComputeError::TimedOut))));
        assert_eq!(compute.calls.load(Ordering::SeqCst), 0);
    }
}
