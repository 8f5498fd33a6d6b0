//! Credential store contract and JSON file implementation.
//!
//! # Responsibility
//! - Load and save the complete user record list.
//! - Answer username existence checks.
//!
//! # Invariants
//! - `save` validates every record and username uniqueness before writing.
//! - `load` rejects files that break record invariants.
//! - No locking: concurrent writers from several processes may lose updates.

use super::json_file::{read_json_array, write_json_array};
use super::{StoreError, StoreResult};
use crate::model::user::UserRecord;
use log::{debug, error};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default file name of the user store inside a data directory.
pub const USERS_FILE_NAME: &str = "users.json";

/// Persistence contract for user credential records.
pub trait CredentialStore {
    /// Returns all records, or an empty list when nothing was saved yet.
    fn load(&self) -> StoreResult<Vec<UserRecord>>;

    /// Replaces the persisted list with `records`.
    fn save(&self, records: &[UserRecord]) -> StoreResult<()>;

    /// Returns whether a record with exactly `username` exists.
    fn contains(&self, username: &str) -> StoreResult<bool> {
        Ok(self
            .load()?
            .iter()
            .any(|record| record.username == username))
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn load(&self) -> StoreResult<Vec<UserRecord>> {
        (**self).load()
    }

    fn save(&self, records: &[UserRecord]) -> StoreResult<()> {
        (**self).save(records)
    }
}

/// User store backed by one pretty-printed JSON array file.
#[derive(Debug, Clone)]
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/users.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(USERS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> StoreResult<Vec<UserRecord>> {
        let started_at = Instant::now();
        let result = read_json_array::<UserRecord>(&self.path).and_then(|records| {
            validate_records(&records)?;
            Ok(records)
        });

        match &result {
            Ok(records) => debug!(
                "event=users_load module=repo status=ok records={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=users_load module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn save(&self, records: &[UserRecord]) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = validate_records(records).and_then(|()| write_json_array(&self.path, records));

        match &result {
            Ok(()) => debug!(
                "event=users_save module=repo status=ok records={} duration_ms={}",
                records.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=users_save module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn validate_records(records: &[UserRecord]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|err| StoreError::InvalidData(format!("record {index}: {err}")))?;
        if !seen.insert(record.username.as_str()) {
            return Err(StoreError::InvalidData(format!(
                "record {index}: duplicate username"
            )));
        }
    }
    Ok(())
}
