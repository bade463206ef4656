//! Project path normalization.
//! Turns a raw, possibly quoted, user-typed path into a clean `PathBuf` and
//! rejects strings no filesystem on this platform would accept.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Typical PATH_MAX.
#[cfg_attr(windows, allow(dead_code))]
const MAX_PATH_LEN: usize = 4096;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathInputError {
    #[error("file path cannot be empty")]
    Empty,
    #[error("file path contains invalid null character")]
    NulByte,
    #[error("file path is too long ({0} bytes)")]
    TooLong(usize),
    #[error("file path contains invalid character: {0}")]
    InvalidChar(char),
    #[error("file path uses reserved Windows name: {0}")]
    ReservedName(String),
    #[error("file path cannot end with a space or dot on Windows")]
    TrailingSpaceOrDot,
}

/// Validate and normalize `input` into a usable path.
///
/// - Surrounding whitespace and quotes (as pasted from a shell) are dropped.
/// - A leading `~` expands to the home directory when one is known.
/// - `.` segments and `a/..` pairs are folded lexically (no filesystem access).
pub fn normalize_path(input: &str) -> Result<PathBuf, PathInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PathInputError::Empty);
    }
    if trimmed.contains('\0') {
        return Err(PathInputError::NulByte);
    }

    let unquoted = trimmed.trim_matches(|c| c == '\'' || c == '"').trim();
    if unquoted.is_empty() {
        return Err(PathInputError::Empty);
    }

    let expanded = expand_home(unquoted);
    let cleaned = clean(&expanded);
    validate(&cleaned)?;
    Ok(dunce::simplified(&cleaned).to_path_buf())
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}

/// Lexical clean: drops `.`, folds `name/..`, never climbs above a root.
fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

#[cfg(windows)]
fn validate(path: &Path) -> Result<(), PathInputError> {
    let text = path.to_string_lossy();
    if let Some(c) = text.chars().find(|c| r#"<>"|?*"#.contains(*c)) {
        return Err(PathInputError::InvalidChar(c));
    }
    if let Some(base) = path.file_name().map(|b| b.to_string_lossy().into_owned()) {
        if is_reserved_windows_name(&base) {
            return Err(PathInputError::ReservedName(base));
        }
        if base.ends_with(' ') || base.ends_with('.') {
            return Err(PathInputError::TrailingSpaceOrDot);
        }
    }
    Ok(())
}

#[cfg(not(windows))]
fn validate(path: &Path) -> Result<(), PathInputError> {
    let len = path.as_os_str().len();
    if len > MAX_PATH_LEN {
        return Err(PathInputError::TooLong(len));
    }
    Ok(())
}

/// CON, PRN, AUX, NUL, COM1-9, LPT1-9, with or without an extension.
#[cfg_attr(not(windows), allow(dead_code))]
fn is_reserved_windows_name(base: &str) -> bool {
    let stem = base.split('.').next().unwrap_or(base).to_ascii_uppercase();
    match stem.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        s if s.len() == 4 && (s.starts_with("COM") || s.starts_with("LPT")) => {
            matches!(s.as_bytes()[3], b'1'..=b'9')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_nul() {
        assert_eq!(normalize_path("   "), Err(PathInputError::Empty));
        assert_eq!(normalize_path("''"), Err(PathInputError::Empty));
        assert_eq!(normalize_path("a\0b"), Err(PathInputError::NulByte));
    }

    #[test]
    fn strips_quotes_and_cleans() {
        let p = normalize_path("'./proj/sub/../app/'").unwrap();
        assert_eq!(p, PathBuf::from("proj").join("app"));
    }

    #[test]
    fn relative_parent_segments_are_kept() {
        let p = normalize_path("../x/./y").unwrap();
        assert_eq!(p, PathBuf::from("..").join("x").join("y"));
    }

    #[test]
    fn dot_only_becomes_current_dir() {
        assert_eq!(normalize_path("./").unwrap(), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_path_cannot_climb_above_root() {
        assert_eq!(normalize_path("/tmp/../../proj").unwrap(), PathBuf::from("/proj"));
    }

    #[cfg(unix)]
    #[test]
    fn overlong_path_is_rejected() {
        let long = format!("/{}", "a".repeat(MAX_PATH_LEN + 1));
        assert!(matches!(normalize_path(&long), Err(PathInputError::TooLong(_))));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(normalize_path("~/proj").unwrap(), clean(&home.join("proj")));
        }
    }

    #[test]
    fn reserved_names() {
        assert!(is_reserved_windows_name("CON"));
        assert!(is_reserved_windows_name("com3.txt"));
        assert!(is_reserved_windows_name("lpt9"));
        assert!(!is_reserved_windows_name("COM0"));
        assert!(!is_reserved_windows_name("console"));
    }
}
