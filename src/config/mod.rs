//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, OverwritePolicy};
pub use xml::{create_template_config, load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CONFCOPY_CONFIG";
/// Catalog file used when neither XML nor CLI name one.
pub const CATALOG_DEFAULT: &str = "config.yaml";
/// Directory catalog paths are resolved against by default.
pub const SOURCE_DIR_DEFAULT: &str = "./configs";
