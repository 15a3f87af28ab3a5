//! Row-band partitioning and progress aggregation for the render scheduler.
//!
//! The image is split into contiguous runs of rows (bands), one per worker.
//! Each worker reports its own completion fraction; the aggregate is
//! forwarded to a [`Progress`] sink only when it increases.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// A contiguous run of image rows rendered by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Index of this band (and of its worker)
    pub index: usize,
    /// First row, counted from the top of the image
    pub start_row: u32,
    /// One past the last row
    pub end_row: u32,
}

impl Band {
    pub fn new(index: usize, start_row: u32, end_row: u32) -> Self {
        Self {
            index,
            start_row,
            end_row,
        }
    }

    /// Number of rows in this band.
    pub fn rows(&self) -> u32 {
        self.end_row - self.start_row
    }
}

/// Default worker count: one less than the hardware parallelism, at least 1.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Clamp a requested worker count to `[1, height]`.
pub fn clamp_worker_count(requested: usize, height: u32) -> usize {
    requested.min(height as usize).max(1)
}

/// Split `height` rows into `workers` contiguous bands.
///
/// Every band gets `height / workers` rows and the last one absorbs the
/// remainder. `workers` must already be clamped with [`clamp_worker_count`].
pub fn partition_rows(height: u32, workers: usize) -> Vec<Band> {
    let workers = workers.max(1) as u32;
    let rows_per_band = height / workers;

    (0..workers)
        .map(|k| {
            let start = k * rows_per_band;
            let end = if k + 1 == workers {
                height
            } else {
                start + rows_per_band
            };
            Band::new(k as usize, start, end)
        })
        .collect()
}

/// Receiver of aggregate render progress, in percent.
///
/// Values arrive in strictly increasing order, from whichever worker thread
/// finished a row.
pub trait Progress: Sync {
    fn update(&self, percent: f64);
}

impl<F> Progress for F
where
    F: Fn(f64) + Sync,
{
    fn update(&self, percent: f64) {
        self(percent)
    }
}

/// Progress sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&self, _percent: f64) {}
}

/// Progress sink that logs at `info` every time another `step` percent is
/// completed.
#[derive(Debug)]
pub struct LogProgress {
    step: f64,
    last_step: AtomicU32,
}

impl LogProgress {
    pub fn new(step: f64) -> Self {
        Self {
            step: step.max(f64::EPSILON),
            last_step: AtomicU32::new(0),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Progress for LogProgress {
    fn update(&self, percent: f64) {
        let step = (percent / self.step).floor() as u32;
        if self.last_step.fetch_max(step, Ordering::Relaxed) < step {
            log::info!("Render progress: {:.1}%", percent);
        }
    }
}

struct TrackerState {
    fractions: Vec<f64>,
    reported: f64,
}

/// Aggregates per-band completion fractions into a monotonic percentage.
pub struct ProgressTracker<'a> {
    state: Mutex<TrackerState>,
    sink: &'a dyn Progress,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(bands: usize, sink: &'a dyn Progress) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                fractions: vec![0.0; bands],
                reported: 0.0,
            }),
            sink,
        }
    }

    /// Record that `band` is `fraction` complete and forward the new mean
    /// if it exceeds everything reported so far.
    pub fn report(&self, band: usize, fraction: f64) {
        // A panicking worker cannot leave the fractions half-written
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(slot) = state.fractions.get_mut(band) {
            *slot = fraction.clamp(0.0, 1.0);
        }

        let count = state.fractions.len().max(1) as f64;
        let percent = 100.0 * state.fractions.iter().sum::<f64>() / count;
        if percent > state.reported {
            state.reported = percent;
            self.sink.update(percent);
        }
    }
}
