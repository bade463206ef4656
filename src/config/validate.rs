//! Config validation logic.
//! Verifies the base source directory before any copy is attempted.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use super::types::Config;

impl Config {
    /// Validate the source directory: it must exist, be a directory and be readable.
    pub fn validate(&self) -> Result<()> {
        let src = &self.source_dir;
        ensure_dir_exists_and_is_dir(src, "source_dir")?;
        ensure_readable(src, "source_dir")?;

        info!(
            "Config validated: catalog='{}' source_dir='{}' log_file='{}'",
            self.catalog.display(),
            src.display(),
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        );
        Ok(())
    }
}

/// Ensure path exists and is a directory; emit clear errors with path context.
fn ensure_dir_exists_and_is_dir(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        error!("{name} does not exist: {}", path.display());
        bail!("{name} does not exist: {}", path.display());
    }
    if !path.is_dir() {
        error!("{name} is not a directory: {}", path.display());
        bail!("{name} is not a directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is readable by attempting to open its entries.
fn ensure_readable(path: &Path, name: &str) -> Result<()> {
    fs::read_dir(path).with_context(|| {
        format!("Cannot read {name} directory '{}'; check permissions", path.display())
    })?;
    debug!("{name} readable: {}", path.display());
    Ok(())
}
