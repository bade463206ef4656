//! Core library for `confcopy`.
//!
//! Loads a catalog of configuration bundles, resolves the user's selection
//! into a flat file list and copies it into a project directory with one
//! concurrent task per file. Overwrite prompts and result output share a
//! single confirmation gate so the terminal never interleaves.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod copy;
pub mod errors;
pub mod output;
pub mod path_input;
pub mod prompt;
pub mod report;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use config::{
    Config, LogLevel, OverwritePolicy, default_config_path, default_log_path,
    load_config_from_xml_path, path_has_symlink_ancestor,
};
pub use copy::{ConfirmationGate, CopyOrchestrator, CopyOutcome, CopyResult};
pub use errors::{BatchError, CopyError};
pub use path_input::{PathInputError, normalize_path};
pub use prompt::{ClackTerminal, LineTerminal, Terminal, stdio_terminal};
pub use report::{PostNote, Report, Reporter};
