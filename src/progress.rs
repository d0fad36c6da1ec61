//! Byte-level copy progress reporting.

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

/// Sink for copy progress. Purely observational: nothing downstream
/// depends on what it is told.
pub trait ProgressSink {
    /// Called once before the first file with the total byte volume
    fn on_start(&mut self, bytes_total: u64);

    /// Called when a file starts copying, with its path relative to the tree root
    fn on_file(&mut self, _rel_path: &str) {}

    /// Called after each file with the bytes just copied
    fn on_advance(&mut self, bytes: u64);

    /// Called once after the last file
    fn on_finish(&mut self);
}

/// indicatif progress bar showing bytes copied, total, and ETA
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_start(&mut self, bytes_total: u64) {
        let bar = ProgressBar::new(bytes_total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        self.bar = Some(bar);
    }

    fn on_file(&mut self, rel_path: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(ui::truncate_path(rel_path, 40));
        }
    }

    fn on_advance(&mut self, bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(bytes);
        }
    }

    fn on_finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// No-op sink for quiet paths and tests
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_start(&mut self, _bytes_total: u64) {}
    fn on_advance(&mut self, _bytes: u64) {}
    fn on_finish(&mut self) {}
}
