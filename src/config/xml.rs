//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Writes a commented template on request (`--init-config`).
//!
//! Notes:
//! - A missing file means "use defaults"; a present but malformed file is fatal.
//! - Unknown XML fields are rejected to surface typos early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel, OverwritePolicy};
use super::{CATALOG_DEFAULT, SOURCE_DIR_DEFAULT};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    catalog: Option<String>,
    source_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    max_concurrency: Option<usize>,
    overwrite: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for an optional count.
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("max_concurrency '{s}': {e}"))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.catalog.as_deref()) {
        cfg.catalog = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.source_dir.as_deref()) {
        cfg.source_dir = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.overwrite.as_deref()) {
        cfg.overwrite = s.parse::<OverwritePolicy>().map_err(anyhow::Error::msg)?;
    }
    if let Some(n) = parsed.max_concurrency {
        cfg.max_concurrency = n;
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the config file named by `$CONFCOPY_CONFIG` or the default location.
/// Returns Ok(None) when there is no file, so callers fall back to defaults.
pub fn load_config() -> Result<Option<(Config, PathBuf)>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let cfg = load_config_from_xml_path(&path)?;
    Ok(Some((cfg, path)))
}

/// Write the commented template config to `path`.
/// Refuses existing files and symlinked ancestors.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/confcopy.log".into());

    let content = format!(
        "<!--\n  confcopy configuration (XML)\n\n    catalog          -> YAML catalog mapping labels to files\n    source_dir       -> directory catalog paths are relative to\n    log_level        -> quiet | normal | info | debug\n    log_file         -> path to log file (optional; leave empty to disable)\n    max_concurrency  -> maximum parallel copies (0 = one per file)\n    overwrite        -> ask | always | never\n\n  CLI flags override XML values.\n  Suggested log file: {}\n-->\n<config>\n  <catalog>{}</catalog>\n  <source_dir>{}</source_dir>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <max_concurrency>0</max_concurrency>\n  <overwrite>ask</overwrite>\n</config>\n",
        suggested_log, CATALOG_DEFAULT, SOURCE_DIR_DEFAULT
    );

    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts
        .open(path)
        .with_context(|| format!("create config file '{}'", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write config file '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_all_fields() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(
            &p,
            "<config>\n  <catalog>cat.yaml</catalog>\n  <source_dir>/srv/configs</source_dir>\n  <log_level>debug</log_level>\n  <log_file>/tmp/c.log</log_file>\n  <max_concurrency> 4 </max_concurrency>\n  <overwrite>never</overwrite>\n</config>\n",
        )
        .unwrap();
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.catalog, PathBuf::from("cat.yaml"));
        assert_eq!(cfg.source_dir, PathBuf::from("/srv/configs"));
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/c.log")));
        assert_eq!(cfg.max_concurrency, 4);
        assert_eq!(cfg.overwrite, OverwritePolicy::Never);
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><log_file>  </log_file></config>").unwrap();
        assert_eq!(load_config_from_xml_path(&p).unwrap(), Config::default());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><download_base>/x</download_base></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn bad_values_are_rejected() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.xml");
        fs::write(&p, "<config><log_level>loud</log_level></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
        fs::write(&p, "<config><max_concurrency>many</max_concurrency></config>").unwrap();
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn template_round_trips_and_is_not_clobbered() {
        let td = tempdir().unwrap();
        let base = fs::canonicalize(td.path()).unwrap();
        let p = base.join("nested").join("config.xml");
        create_template_config(&p).unwrap();
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(create_template_config(&p).is_err());
    }
}
