//! Typed error definitions for confcopy.
//! Per-file failures are data (they ride inside a `CopyResult`); only the
//! aggregate `BatchError` is returned to callers of the orchestrator.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single file could not be copied.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("cannot open source {path}: {source}")]
    OpenSource { path: PathBuf, source: io::Error },

    #[error("source {path} is not a regular file")]
    NotAFile { path: PathBuf },

    #[error("failed to create directory path {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot create destination {path}: {source}")]
    CreateDestination { path: PathBuf, source: io::Error },

    #[error("copy into {path} failed: {source}")]
    Transfer { path: PathBuf, source: io::Error },

    #[error("failed to flush {path} to disk: {source}")]
    Sync { path: PathBuf, source: io::Error },

    #[error("overwrite cancelled by user")]
    OverwriteCancelled,

    #[error("overwrite prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("copy task panicked: {0}")]
    Panicked(String),
}

impl CopyError {
    /// Stable short identifier, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CopyError::OpenSource { .. } => "open_source",
            CopyError::NotAFile { .. } => "not_a_file",
            CopyError::CreateDir { .. } => "create_dir",
            CopyError::CreateDestination { .. } => "create_destination",
            CopyError::Transfer { .. } => "transfer",
            CopyError::Sync { .. } => "sync",
            CopyError::OverwriteCancelled => "overwrite_cancelled",
            CopyError::Prompt(_) => "prompt",
            CopyError::Panicked(_) => "panicked",
        }
    }
}

/// Batch-level failure of `CopyOrchestrator::copy_all`.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to create destination directory {path}: {source}")]
    DestinationRoot { path: PathBuf, source: io::Error },

    #[error("{failed} of {total} files failed to copy")]
    Failed { failed: usize, total: usize },

    #[error("failed to start copy workers: {0}")]
    Workers(String),
}
