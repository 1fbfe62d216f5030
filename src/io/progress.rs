//! Terminal progress display for batch runs and materializer phases

use crate::algorithm::observer::{Phase, ProgressObserver};
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Coordinates progress display for batch operations
///
/// Shows one bar for the phase of the region being processed and, when more
/// than one region is queued, a batch bar counting finished regions.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    phase_bar: Option<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} {{msg:>13}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Regions: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            phase_bar: None,
            file_count: 0,
        }
    }

    /// Initialize progress bars based on region file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        if file_count > 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        if file_count > 0 {
            let phase_bar = ProgressBar::new(0);
            phase_bar.set_style(PHASE_STYLE.clone());
            self.phase_bar = Some(self.multi_progress.add(phase_bar));
        }
    }

    /// Label the phase bar with the region being processed
    pub fn start_file(&self, path: &Path) {
        if let Some(bar) = &self.phase_bar {
            let display_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            bar.set_prefix(display_name);
            bar.set_length(0);
            bar.set_position(0);
        }
    }

    /// Mark a region as completed and update batch progress
    pub fn complete_file(&self, _elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(bar) = &self.phase_bar {
            bar.set_message("done");
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message(format!("{} regions processed", self.file_count));
        }
        if let Some(bar) = &self.phase_bar {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }
}

impl ProgressObserver for ProgressManager {
    fn phase_started(&self, phase: Phase, total: usize) {
        if let Some(bar) = &self.phase_bar {
            bar.set_length(total as u64);
            bar.set_position(0);
            bar.set_message(phase.label());
        }
    }

    fn advance(&self, _phase: Phase, units: usize) {
        if let Some(bar) = &self.phase_bar {
            bar.inc(units as u64);
        }
    }

    fn phase_finished(&self, _phase: Phase, _elapsed: Duration) {
        if let Some(bar) = &self.phase_bar
            && let Some(length) = bar.length()
        {
            bar.set_position(length);
        }
    }
}
