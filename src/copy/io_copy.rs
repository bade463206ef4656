//! Streaming copy with durability.
//!
//! - Refuses sources that are not regular files before touching the destination.
//! - Creates missing parent directories of the destination.
//! - Creates or truncates the destination (overwrite was already decided upstream).
//! - Buffered I/O, then `sync_all` so the bytes are on stable storage before
//!   the copy is reported as successful.
//!
//! Each step maps to its own `CopyError` variant so the report says which
//! stage failed.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::CopyError;

/// Config files are small; most fit in one read.
const BUF_SIZE: usize = 64 * 1024;

/// Copy `src` -> `dst`, returning the number of bytes written.
pub(crate) fn copy_file(src: &Path, dst: &Path) -> Result<u64, CopyError> {
    let src_f = File::open(src).map_err(|source| CopyError::OpenSource {
        path: src.to_path_buf(),
        source,
    })?;
    let meta = src_f.metadata().map_err(|source| CopyError::OpenSource {
        path: src.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(CopyError::NotAFile {
            path: src.to_path_buf(),
        });
    }

    if let Some(dir) = dst.parent() {
        fs::create_dir_all(dir).map_err(|source| CopyError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let dst_f = File::create(dst).map_err(|source| CopyError::CreateDestination {
        path: dst.to_path_buf(),
        source,
    })?;

    let transfer = |source: io::Error| CopyError::Transfer {
        path: dst.to_path_buf(),
        source,
    };
    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer).map_err(transfer)?;
    writer.flush().map_err(transfer)?;

    writer.get_ref().sync_all().map_err(|source| CopyError::Sync {
        path: dst.to_path_buf(),
        source,
    })?;

    Ok(bytes)
}
