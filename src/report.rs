use crate::constants::PROGRESS_BAR_TEMPLATE;
use crate::error::TranscodeError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Terminal outcome for one candidate file. Every candidate produces
/// exactly one of these, never both, never neither.
#[derive(Debug)]
pub enum FileOutcome {
    Compressed {
        input: PathBuf,
        output: PathBuf,
        bytes_before: u64,
        bytes_after: u64,
    },
    Failed {
        input: PathBuf,
        error: TranscodeError,
    },
}

/// Receives one event per processed file. How the event is rendered is up
/// to the implementation; the transcoder imposes no format.
pub trait Reporter {
    fn run_started(&mut self, _total_files: usize) {}
    fn file_done(&mut self, outcome: &FileOutcome);
    fn run_finished(&mut self) {}
}

/// Console reporter: a progress bar over the candidate list plus one
/// human-readable line per outcome.
#[derive(Default)]
pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, total_files: usize) {
        println!("📊 Found {} image files to process", total_files);

        let progress = ProgressBar::new(total_files as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.progress = Some(progress);
    }

    fn file_done(&mut self, outcome: &FileOutcome) {
        let line = match outcome {
            FileOutcome::Compressed {
                input,
                output,
                bytes_before,
                bytes_after,
            } => format!(
                "✅ Compressed: {} -> {} ({} -> {} bytes)",
                input.display(),
                output.display(),
                bytes_before,
                bytes_after
            ),
            FileOutcome::Failed { input, error } => {
                format!("❌ Failed: {} ({})", input.display(), error)
            }
        };

        // Suspend keeps the bar's redraw line intact on a terminal while the
        // line still reaches stdout when output is piped and the bar is hidden.
        match &self.progress {
            Some(progress) => progress.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }

        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }

    fn run_finished(&mut self) {
        if let Some(progress) = self.progress.take() {
            progress.finish_and_clear();
        }
    }
}

/// Aggregate statistics for one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Compressed {
                bytes_before,
                bytes_after,
                ..
            } => {
                self.succeeded += 1;
                self.bytes_before += bytes_before;
                self.bytes_after += bytes_after;
            }
            FileOutcome::Failed { .. } => {
                self.failed += 1;
            }
        }
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Size reduction as a percentage of the original bytes. Negative when
    /// the outputs grew.
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_before == 0 {
            return 0.0;
        }
        ((self.bytes_before as f64 - self.bytes_after as f64) / self.bytes_before as f64) * 100.0
    }
}
