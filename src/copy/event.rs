//! Outcome record passed from copy tasks to the reporter.

use std::path::PathBuf;

use crate::errors::CopyError;

/// Result of one file-copy attempt. Produced once by the task that did the
/// work and moved through the result channel to the reporter.
#[derive(Debug)]
pub struct CopyResult {
    /// Catalog-relative source path.
    pub source: PathBuf,
    /// Where the file was (or would have been) written.
    pub destination: PathBuf,
    pub outcome: CopyOutcome,
}

#[derive(Debug)]
pub enum CopyOutcome {
    Copied {
        bytes: u64,
        post_message: Option<String>,
    },
    Failed(CopyError),
}

impl CopyResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CopyOutcome::Copied { .. })
    }

    pub fn error(&self) -> Option<&CopyError> {
        match &self.outcome {
            CopyOutcome::Failed(e) => Some(e),
            CopyOutcome::Copied { .. } => None,
        }
    }

    /// Post-copy message of a successful copy, if non-empty.
    pub fn post_message(&self) -> Option<&str> {
        match &self.outcome {
            CopyOutcome::Copied {
                post_message: Some(m),
                ..
            } if !m.is_empty() => Some(m),
            _ => None,
        }
    }
}
