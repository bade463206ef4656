//! Result reporter.
//! Drains copy results as they arrive, prints one line per result through the
//! confirmation gate, then prints the summary and any post-copy messages.

use std::path::PathBuf;
use tracing::{error, info};

use crate::copy::{ConfirmationGate, CopyResult};
use crate::errors::BatchError;
use crate::output::Tone;
use crate::prompt::Terminal;

/// A post-copy message attached to a successful copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostNote {
    pub destination: PathBuf,
    pub message: String,
}

/// Final tally of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub succeeded: usize,
    pub failed: usize,
    /// Successful copies with a message, in the order they were reported.
    pub notes: Vec<PostNote>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// `Err(BatchError::Failed)` when at least one file failed.
    pub fn into_result(self) -> Result<Report, BatchError> {
        if self.failed > 0 {
            Err(BatchError::Failed {
                failed: self.failed,
                total: self.total(),
            })
        } else {
            Ok(self)
        }
    }
}

pub struct Reporter<'g, T> {
    gate: &'g ConfirmationGate<T>,
    report: Report,
}

impl<'g, T: Terminal> Reporter<'g, T> {
    pub fn new(gate: &'g ConfirmationGate<T>) -> Self {
        Self {
            gate,
            report: Report::default(),
        }
    }

    /// Consume every result until the stream ends, then print the summary.
    pub fn drain(mut self, results: impl IntoIterator<Item = CopyResult>) -> Report {
        for result in results {
            self.record(result);
        }
        self.finish()
    }

    /// Print and tally one result.
    pub fn record(&mut self, result: CopyResult) {
        let src = result.source.display();
        let dst = result.destination.display();
        match result.error() {
            Some(e) => {
                self.report.failed += 1;
                error!(kind = e.kind(), source = %src, dest = %dst, error = %e, "Copy failed");
                self.gate
                    .say(Tone::Error, &format!("Failed to copy {src} to {dst}: {e}"));
            }
            None => {
                self.report.succeeded += 1;
                self.gate
                    .say(Tone::Success, &format!("Successfully copied {src} to {dst}"));
                if let Some(message) = result.post_message() {
                    self.report.notes.push(PostNote {
                        destination: result.destination.clone(),
                        message: message.to_string(),
                    });
                }
            }
        }
    }

    /// Print the summary line and the post-copy messages.
    pub fn finish(self) -> Report {
        let report = self.report;
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "Copy batch finished"
        );
        self.gate.with(|t| {
            t.say(Tone::Plain, "");
            if report.failed > 0 {
                t.say(Tone::Error, &format!("Completed with {} errors", report.failed));
            } else {
                t.say(
                    Tone::Success,
                    &format!("Successfully copied {} files", report.succeeded),
                );
            }
            t.say(Tone::Plain, "");
            for note in &report.notes {
                t.say(
                    Tone::Info,
                    &format!("{}: {}", note.destination.display(), note.message),
                );
            }
        });
        report
    }
}
