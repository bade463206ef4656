//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - OverwritePolicy decides what happens when a destination file exists.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{CATALOG_DEFAULT, SOURCE_DIR_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// Batch-level progress
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Ask the user, one file at a time (default)
    #[default]
    Ask,
    /// Overwrite without asking
    Always,
    /// Keep existing files; each collision is reported as cancelled
    Never,
}

impl FromStr for OverwritePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ask" | "prompt" => Ok(OverwritePolicy::Ask),
            "always" | "yes" => Ok(OverwritePolicy::Always),
            "never" | "no" | "skip" => Ok(OverwritePolicy::Never),
            _ => Err(format!("invalid overwrite policy: '{s}' (expected ask, always or never)")),
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OverwritePolicy::Ask => "ask",
            OverwritePolicy::Always => "always",
            OverwritePolicy::Never => "never",
        })
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Catalog (YAML) listing the bundles
    pub catalog: PathBuf,
    /// Directory catalog paths are relative to
    pub source_dir: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Upper bound on concurrent copy tasks; 0 = one task per file
    pub max_concurrency: usize,
    /// Collision handling
    pub overwrite: OverwritePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(CATALOG_DEFAULT),
            source_dir: PathBuf::from(SOURCE_DIR_DEFAULT),
            log_level: LogLevel::Normal,
            log_file: None,
            max_concurrency: 0,
            overwrite: OverwritePolicy::Ask,
        }
    }
}

impl Config {
    /// Construct a Config with explicit catalog and source dir; other fields use defaults.
    pub fn new(catalog: impl Into<PathBuf>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: catalog.into(),
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parsing() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Normal.to_string(), "normal");
    }

    #[test]
    fn overwrite_policy_parsing() {
        assert_eq!("Always".parse::<OverwritePolicy>().unwrap(), OverwritePolicy::Always);
        assert_eq!("skip".parse::<OverwritePolicy>().unwrap(), OverwritePolicy::Never);
        assert_eq!(" ask ".parse::<OverwritePolicy>().unwrap(), OverwritePolicy::Ask);
        assert!("sometimes".parse::<OverwritePolicy>().is_err());
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.catalog, PathBuf::from("config.yaml"));
        assert_eq!(cfg.source_dir, PathBuf::from("./configs"));
        assert_eq!(cfg.max_concurrency, 0);
        assert_eq!(cfg.overwrite, OverwritePolicy::Ask);
    }
}
