//! Flat-file persistence for credential records.
//!
//! # Responsibility
//! - Define the credential store contract used by services.
//! - Isolate JSON file details from authentication logic.
//!
//! # Invariants
//! - Files are read and rewritten whole; there is no incremental update.
//! - Read paths reject invalid persisted state instead of masking it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_file;
pub mod user_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure for flat-file record persistence.
#[derive(Debug)]
pub enum StoreError {
    /// File system failure (permissions, disk full, missing parent).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File exists but is not a JSON array of the expected shape.
    ///
    /// Only the position is kept; parser messages can quote file content.
    Malformed {
        path: PathBuf,
        line: usize,
        column: usize,
    },
    /// Structurally valid JSON that breaks record invariants.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Malformed { path, line, column } => write!(
                f,
                "malformed user data in `{}` at line {line} column {column}",
                path.display()
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { .. } | Self::InvalidData(_) => None,
        }
    }
}
