//! User credential domain model.
//!
//! # Responsibility
//! - Define the persisted username/password-digest record.
//! - Compute and verify SHA-256 password digests.
//!
//! # Invariants
//! - `username` is non-empty and compared case-sensitively.
//! - `password_hash` is always 64 lowercase hex chars; plaintext never lands here.
//! - Records are created once and never updated in place.
//! - Errors never carry the stored digest text, so they are safe to log.
//! - Unknown keys on a persisted record survive a rewrite.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DIGEST_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 digest of a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hashes `password` bytes (UTF-8) with a single SHA-256 pass.
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns whether `password` hashes to this digest.
    ///
    /// Comparison time does not depend on where the digests differ.
    pub fn matches(&self, password: &str) -> bool {
        let candidate = Self::of(password);
        constant_time_eq(self.0.as_bytes(), candidate.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the wrapped text is 64 lowercase hex chars.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == DIGEST_HEX_LEN
            && self
                .0
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte))
    }
}

impl Display for PasswordDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted credential record.
///
/// Serialized as `{"username": ..., "password": <hex digest>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: PasswordDigest,
    /// Keys written by other tools, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Builds a record from plaintext credentials, hashing the password.
    ///
    /// The username is stored as given; callers normalize it first.
    pub fn new(
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let username = username.into();
        validate_credentials(&username, password)?;
        Ok(Self {
            username,
            password_hash: PasswordDigest::of(password),
            extra: Map::new(),
        })
    }

    /// Checks record-level invariants, used on every read path.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        if self.username.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if !self.password_hash.is_well_formed() {
            return Err(CredentialValidationError::InvalidDigest);
        }
        Ok(())
    }
}

/// Rejects empty username or password input.
pub fn validate_credentials(
    username: &str,
    password: &str,
) -> Result<(), CredentialValidationError> {
    if username.is_empty() {
        return Err(CredentialValidationError::EmptyUsername);
    }
    if password.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    Ok(())
}

/// Validation failures for credential input and persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    EmptyUsername,
    EmptyPassword,
    InvalidDigest,
}

impl Display for CredentialValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidDigest => write!(f, "password digest is not 64 lowercase hex chars"),
        }
    }
}

impl Error for CredentialValidationError {}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut diff = 0u8;
    for (l, r) in left.iter().zip(right.iter()) {
        diff |= l ^ r;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::{constant_time_eq, CredentialValidationError, PasswordDigest, UserRecord};

    #[test]
    fn constant_time_eq_compares_length_and_bytes() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    #[test]
    fn well_formed_check_rejects_uppercase_and_short_values() {
        let digest = PasswordDigest::of("x");
        assert!(digest.is_well_formed());
        assert!(!PasswordDigest(digest.as_str().to_ascii_uppercase()).is_well_formed());
        assert!(!PasswordDigest("abc123".to_string()).is_well_formed());
    }

    #[test]
    fn invalid_digest_error_does_not_echo_stored_value() {
        let mut record = UserRecord::new("bob", "pw").expect("valid record");
        record.password_hash = PasswordDigest("hunter2-plaintext".to_string());

        let err = record.validate().expect_err("plaintext is not a digest");
        assert_eq!(err, CredentialValidationError::InvalidDigest);
        assert!(!err.to_string().contains("hunter2"));
    }
}
