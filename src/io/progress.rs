//! Progress display for tiling, fan-out and stitching stages

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static WORKER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>10} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix:>10} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates progress bars for one run
///
/// Fan-out gets one bar per worker for small worker counts and a single
/// aggregate bar otherwise, so large pools don't flood the terminal.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    stage_bar: Option<ProgressBar>,
    worker_bars: Vec<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with no bars
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            stage_bar: None,
            worker_bars: Vec::new(),
        }
    }

    /// Start a sequential stage of `total` steps, replacing any previous one
    pub fn start_stage(&mut self, name: &str, total: usize) {
        self.clear_bars();
        let bar = ProgressBar::new(total as u64);
        bar.set_style(STAGE_STYLE.clone());
        bar.set_prefix(name.to_string());
        self.stage_bar = Some(self.multi_progress.add(bar));
    }

    /// Start a fan-out over `workers` workers sharing `total` tiles
    ///
    /// Chunk sizes follow the interleaved distribution, so each worker bar
    /// gets its exact share.
    pub fn start_workers(&mut self, total: usize, workers: usize) {
        if workers > MAX_INDIVIDUAL_PROGRESS_BARS || workers == 0 {
            self.start_stage("workers", total);
            return;
        }

        self.clear_bars();
        for worker in 0..workers {
            let share = total / workers + usize::from(worker < total % workers);
            let bar = ProgressBar::new(share as u64);
            bar.set_style(WORKER_STYLE.clone());
            bar.set_prefix(format!("worker {worker}"));
            self.worker_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Record one finished step, attributed to `worker` during a fan-out
    pub fn tick(&self, worker: usize) {
        if let Some(bar) = self.worker_bars.get(worker) {
            bar.inc(1);
        } else if let Some(ref bar) = self.stage_bar {
            bar.inc(1);
        }
    }

    /// Number of bars currently shown
    pub fn bar_count(&self) -> usize {
        self.worker_bars.len() + usize::from(self.stage_bar.is_some())
    }

    /// Clean up all progress displays
    pub fn finish(&mut self) {
        self.clear_bars();
        let _ = self.multi_progress.clear();
    }

    fn clear_bars(&mut self) {
        if let Some(bar) = self.stage_bar.take() {
            bar.finish_and_clear();
        }
        for bar in self.worker_bars.drain(..) {
            bar.finish_and_clear();
        }
    }
}
