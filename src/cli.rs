//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Every interactive step has a flag so the tool can run unattended.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel, OverwritePolicy};

/// Copy configuration bundles from a catalog into a project directory.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Copy configuration file bundles into a project"
)]
pub struct Args {
    /// Project directory to copy into (skips the path prompt).
    #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub dest: Option<String>,

    /// Bundle labels to copy, comma separated (skips the selection prompt).
    #[arg(long, value_name = "LABEL", value_delimiter = ',', num_args = 1..)]
    pub select: Option<Vec<String>>,

    /// Do not ask for confirmation before copying.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// What to do when a destination file exists: ask, always, never.
    #[arg(long, value_name = "POLICY")]
    pub overwrite: Option<OverwritePolicy>,

    /// Override the catalog file (normally configured via XML).
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    /// Override the base source directory (normally configured via XML).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// Maximum number of files copied in parallel (0 = one task per file).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Print the catalog labels and exit.
    #[arg(long)]
    pub list: bool,

    /// Show which files would be copied, but do not copy anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where confcopy will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by confcopy and exit")]
    pub print_config: bool,

    /// Write a template config file at the default location, then exit.
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(c) = &self.catalog {
            cfg.catalog = c.clone();
        }
        if let Some(s) = &self.source_dir {
            cfg.source_dir = s.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
        if let Some(j) = self.jobs {
            cfg.max_concurrency = j;
        }
        if let Some(p) = self.overwrite {
            cfg.overwrite = p;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
