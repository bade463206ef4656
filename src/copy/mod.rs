//! Concurrent copy orchestrator.
//!
//! Design:
//! - One rayon task per resolved file; the pool is sized to the batch unless a
//!   concurrency cap is configured.
//! - Overwrite questions and result lines share one `ConfirmationGate`.
//! - Results flow through a `sync_channel` sized to the batch, so producers
//!   never wait on the reporter, which drains it on its own scoped thread.
//! - The channel closes once the pool scope has joined every task and the
//!   last `Sender` clone is dropped. Task bodies run under `catch_unwind`, so a
//!   panic still yields exactly one result.

mod event;
mod gate;
mod io_copy;

pub use event::{CopyOutcome, CopyResult};
pub use gate::ConfirmationGate;

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info};

use crate::catalog::CatalogEntry;
use crate::config::OverwritePolicy;
use crate::errors::{BatchError, CopyError};
use crate::prompt::Terminal;
use crate::report::{Report, Reporter};

pub struct CopyOrchestrator<'g, T> {
    gate: &'g ConfirmationGate<T>,
    source_root: PathBuf,
    overwrite: OverwritePolicy,
    max_concurrency: usize,
}

impl<'g, T: Terminal> CopyOrchestrator<'g, T> {
    /// `source_root` is the directory catalog paths are relative to.
    pub fn new(gate: &'g ConfirmationGate<T>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            gate,
            source_root: source_root.into(),
            overwrite: OverwritePolicy::default(),
            max_concurrency: 0,
        }
    }

    pub fn with_overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite = policy;
        self
    }

    /// Cap the number of concurrent copy tasks; 0 means one task per file.
    pub fn with_max_concurrency(mut self, cap: usize) -> Self {
        self.max_concurrency = cap;
        self
    }

    /// Copy every entry into `destination_root`, reporting each result as it lands.
    ///
    /// Returns the report when every file was copied, `BatchError::Failed` when
    /// any file failed (successful copies stay in place), or
    /// `BatchError::DestinationRoot` when the target directory cannot be created.
    pub fn copy_all(
        &self,
        files: &[CatalogEntry],
        destination_root: &Path,
    ) -> Result<Report, BatchError> {
        fs::create_dir_all(destination_root).map_err(|source| BatchError::DestinationRoot {
            path: destination_root.to_path_buf(),
            source,
        })?;

        let total = files.len();
        let workers = match self.max_concurrency {
            0 => total,
            cap => cap.min(total),
        }
        .max(1);
        info!(
            files = total,
            workers,
            dest = %destination_root.display(),
            source_root = %self.source_root.display(),
            "Starting copy batch"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("confcopy-copy-{i}"))
            .build()
            .map_err(|e| BatchError::Workers(e.to_string()))?;

        let (tx, rx) = mpsc::sync_channel::<CopyResult>(total.max(1));

        let report = thread::scope(|s| {
            let reporter = s.spawn(|| Reporter::new(self.gate).drain(rx));

            // Moving `tx` in means the last sender drops once every task is joined.
            pool.scope(move |ps| {
                for entry in files {
                    let tx = tx.clone();
                    ps.spawn(move |_| {
                        let result = self.run_task(entry, destination_root);
                        // Only fails if the reporter is gone; nothing left to tell then.
                        let _ = tx.send(result);
                    });
                }
            });

            reporter.join()
        })
        .map_err(|_| BatchError::Workers("result reporter panicked".into()))?;

        report.into_result()
    }

    fn run_task(&self, entry: &CatalogEntry, destination_root: &Path) -> CopyResult {
        let destination = destination_root.join(&entry.path);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.copy_one(entry, &destination)))
            .unwrap_or_else(|payload| CopyOutcome::Failed(CopyError::Panicked(panic_text(payload))));
        CopyResult {
            source: entry.path.clone(),
            destination,
            outcome,
        }
    }

    fn copy_one(&self, entry: &CatalogEntry, destination: &Path) -> CopyOutcome {
        if destination.exists() {
            if let Err(e) = self.approve_overwrite(destination) {
                debug!(dest = %destination.display(), kind = e.kind(), "Overwrite not approved");
                return CopyOutcome::Failed(e);
            }
        }

        let source = self.source_root.join(&entry.path);
        match io_copy::copy_file(&source, destination) {
            Ok(bytes) => {
                debug!(src = %source.display(), dest = %destination.display(), bytes, "Copied file");
                CopyOutcome::Copied {
                    bytes,
                    post_message: entry.post_message.clone(),
                }
            }
            Err(e) => CopyOutcome::Failed(e),
        }
    }

    fn approve_overwrite(&self, destination: &Path) -> Result<(), CopyError> {
        match self.overwrite {
            OverwritePolicy::Always => Ok(()),
            OverwritePolicy::Never => Err(CopyError::OverwriteCancelled),
            OverwritePolicy::Ask => {
                let question = format!("File {} already exists. Overwrite?", destination.display());
                match self.gate.confirm(&question) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(CopyError::OverwriteCancelled),
                    Err(e) => Err(CopyError::Prompt(e)),
                }
            }
        }
    }
}

fn panic_text(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Tone;
    use std::collections::VecDeque;
    use std::io;
    use tempfile::tempdir;

    /// Answers confirmations from a queue and records every interaction.
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<bool>,
        questions: Vec<String>,
        lines: Vec<String>,
        panic_on_confirm: bool,
    }

    impl Terminal for Scripted {
        fn text_input(&mut self, _label: &str) -> io::Result<String> {
            Ok(String::new())
        }

        fn multiselect(&mut self, _label: &str, _options: &[String]) -> io::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn confirm(&mut self, question: &str) -> io::Result<bool> {
            self.questions.push(question.to_string());
            if self.panic_on_confirm {
                panic!("terminal exploded");
            }
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
        }

        fn say(&mut self, _tone: Tone, message: &str) {
            self.lines.push(message.to_string());
        }
    }

    fn entry(path: &str, msg: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            path: PathBuf::from(path),
            post_message: msg.map(str::to_string),
        }
    }

    #[test]
    fn copies_into_fresh_destination_without_prompting() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("nginx.conf"), b"server {}").unwrap();
        fs::create_dir_all(src.path().join("nested")).unwrap();
        fs::write(src.path().join("nested/pg.conf"), b"port=5432").unwrap();

        let gate = ConfirmationGate::new(Scripted::default());
        let report = CopyOrchestrator::new(&gate, src.path())
            .copy_all(
                &[entry("nginx.conf", None), entry("nested/pg.conf", Some("set it"))],
                dst.path(),
            )
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.notes.len(), 1);
        assert_eq!(report.notes[0].destination, dst.path().join("nested/pg.conf"));
        assert_eq!(fs::read(dst.path().join("nested/pg.conf")).unwrap(), b"port=5432");
        assert!(gate.into_inner().questions.is_empty());
    }

    #[test]
    fn declined_overwrite_leaves_file_untouched() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a.conf"), b"new").unwrap();
        fs::write(dst.path().join("a.conf"), b"old").unwrap();

        let gate = ConfirmationGate::new(Scripted {
            answers: VecDeque::from([false]),
            ..Default::default()
        });
        let err = CopyOrchestrator::new(&gate, src.path())
            .copy_all(&[entry("a.conf", Some("ignored"))], dst.path())
            .unwrap_err();

        assert!(matches!(err, BatchError::Failed { failed: 1, total: 1 }));
        assert_eq!(fs::read(dst.path().join("a.conf")).unwrap(), b"old");
        let term = gate.into_inner();
        assert_eq!(term.questions.len(), 1);
        assert!(term.questions[0].ends_with("a.conf already exists. Overwrite?"));
        assert!(!term.lines.iter().any(|l| l.contains("ignored")));
    }

    #[test]
    fn accepted_overwrite_replaces_content() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a.conf"), b"new").unwrap();
        fs::write(dst.path().join("a.conf"), b"old and longer").unwrap();

        let gate = ConfirmationGate::new(Scripted {
            answers: VecDeque::from([true]),
            ..Default::default()
        });
        CopyOrchestrator::new(&gate, src.path())
            .copy_all(&[entry("a.conf", None)], dst.path())
            .unwrap();
        assert_eq!(fs::read(dst.path().join("a.conf")).unwrap(), b"new");
    }

    #[test]
    fn policies_skip_the_prompt() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a.conf"), b"new").unwrap();
        fs::write(dst.path().join("a.conf"), b"old").unwrap();
        let files = [entry("a.conf", None)];

        let gate = ConfirmationGate::new(Scripted::default());
        let never = CopyOrchestrator::new(&gate, src.path()).with_overwrite(OverwritePolicy::Never);
        assert!(never.copy_all(&files, dst.path()).is_err());
        assert_eq!(fs::read(dst.path().join("a.conf")).unwrap(), b"old");

        let always = CopyOrchestrator::new(&gate, src.path()).with_overwrite(OverwritePolicy::Always);
        always.copy_all(&files, dst.path()).unwrap();
        assert_eq!(fs::read(dst.path().join("a.conf")).unwrap(), b"new");

        assert!(gate.into_inner().questions.is_empty());
    }

    #[test]
    fn one_failure_does_not_stop_siblings() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(src.path().join(name), name).unwrap();
        }

        let gate = ConfirmationGate::new(Scripted::default());
        let err = CopyOrchestrator::new(&gate, src.path())
            .with_max_concurrency(2)
            .copy_all(
                &[entry("a", None), entry("missing", None), entry("b", None), entry("c", None)],
                dst.path(),
            )
            .unwrap_err();

        assert!(matches!(err, BatchError::Failed { failed: 1, total: 4 }));
        for name in ["a", "b", "c"] {
            assert_eq!(fs::read_to_string(dst.path().join(name)).unwrap(), name);
        }
        let lines = gate.into_inner().lines;
        assert!(lines.iter().any(|l| l.starts_with("Failed to copy missing")));
        assert!(lines.iter().any(|l| l == "Completed with 1 errors"));
    }

    #[test]
    fn prompt_failure_is_a_per_file_error() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a"), b"1").unwrap();
        fs::write(dst.path().join("a"), b"0").unwrap();

        // No scripted answers: the prompt reports EOF.
        let gate = ConfirmationGate::new(Scripted::default());
        let err = CopyOrchestrator::new(&gate, src.path())
            .copy_all(&[entry("a", None)], dst.path())
            .unwrap_err();
        assert!(matches!(err, BatchError::Failed { failed: 1, .. }));
        assert!(gate.into_inner().lines.iter().any(|l| l.contains("overwrite prompt failed")));
    }

    #[test]
    fn panicking_task_still_produces_one_result() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a"), b"1").unwrap();
        fs::write(src.path().join("b"), b"2").unwrap();
        fs::write(dst.path().join("a"), b"0").unwrap();

        let gate = ConfirmationGate::new(Scripted {
            panic_on_confirm: true,
            ..Default::default()
        });
        let err = CopyOrchestrator::new(&gate, src.path())
            .copy_all(&[entry("a", None), entry("b", None)], dst.path())
            .unwrap_err();

        assert!(matches!(err, BatchError::Failed { failed: 1, total: 2 }));
        assert_eq!(fs::read(dst.path().join("b")).unwrap(), b"2");
        let lines = gate.into_inner().lines;
        assert!(lines.iter().any(|l| l.contains("copy task panicked: terminal exploded")));
    }

    #[test]
    fn empty_batch_creates_destination_and_succeeds() {
        let src = tempdir().unwrap();
        let root = tempdir().unwrap();
        let dst = root.path().join("new").join("proj");

        let gate = ConfirmationGate::new(Scripted::default());
        let report = CopyOrchestrator::new(&gate, src.path())
            .copy_all(&[], &dst)
            .unwrap();
        assert_eq!(report.total(), 0);
        assert!(dst.is_dir());
    }

    #[test]
    fn uncreatable_destination_root_is_fatal() {
        let src = tempdir().unwrap();
        let root = tempdir().unwrap();
        let blocker = root.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let gate = ConfirmationGate::new(Scripted::default());
        let err = CopyOrchestrator::new(&gate, src.path())
            .copy_all(&[entry("a", None)], &blocker.join("proj"))
            .unwrap_err();
        assert!(matches!(err, BatchError::DestinationRoot { .. }));
        assert!(gate.into_inner().lines.is_empty());
    }
}
