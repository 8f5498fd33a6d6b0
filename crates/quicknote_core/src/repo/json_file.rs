//! Whole-file JSON array reader/writer.
//!
//! # Invariants
//! - A missing file reads as an empty list.
//! - Output is pretty-printed with 4-space indentation; non-ASCII is kept verbatim.
//! - Writes go to a sibling temp file first, then replace the target by rename.

use super::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";
const TEMP_SUFFIX: &str = ".tmp";

/// Reads a JSON array file fully into memory.
///
/// # Errors
/// - `StoreError::Io` when the file exists but cannot be read.
/// - `StoreError::Malformed` when content is not a JSON array of `T`.
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|err| malformed(path, &err))
}

/// Serializes `items` and replaces the file at `path`.
///
/// Parent directories are created when missing.
pub fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> StoreResult<()> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let bytes = encode_pretty(items).map_err(|err| malformed(path, &err))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let temp_path = temp_path_for(path);
    std::fs::write(&temp_path, &bytes).map_err(io_err)?;
    if let Err(err) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_err(err));
    }
    Ok(())
}

fn malformed(path: &Path, err: &serde_json::Error) -> StoreError {
    StoreError::Malformed {
        path: path.to_path_buf(),
        line: err.line(),
        column: err.column(),
    }
}

fn encode_pretty<T: Serialize>(items: &[T]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    items.serialize(&mut serializer)?;
    Ok(buf)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("records"));
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}
