//! Registration and login use-cases.
//!
//! # Responsibility
//! - Validate credential input and enforce username uniqueness.
//! - Verify login attempts against stored password digests.
//!
//! # Invariants
//! - Registration trims the username; passwords are used verbatim.
//! - Login matches the username exactly as given.
//! - A failed registration never rewrites the store.
//! - Logs carry metadata only: no usernames, passwords or digests.

use crate::model::user::{validate_credentials, CredentialValidationError, UserRecord};
use crate::repo::user_repo::CredentialStore;
use crate::repo::StoreError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Failure of a registration or login attempt.
#[derive(Debug)]
pub enum AuthError {
    /// Empty username or password.
    Validation(CredentialValidationError),
    /// Username is already registered.
    DuplicateUser(String),
    /// Unknown username or wrong password.
    InvalidCredentials,
    /// Credential store could not be read or written.
    Storage(StoreError),
}

impl AuthError {
    /// Stable machine-readable error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateUser(_) => "duplicate_user",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateUser(username) => write!(f, "username `{username}` already exists"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::DuplicateUser(_) | Self::InvalidCredentials => None,
        }
    }
}

impl From<CredentialValidationError> for AuthError {
    fn from(value: CredentialValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Authenticator over a credential store.
pub struct AuthService<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a new user and persists the full record list.
    ///
    /// # Errors
    /// - `Validation` when the trimmed username or the password is empty.
    /// - `DuplicateUser` when the username already exists (exact match).
    /// - `Storage` when loading or saving fails.
    pub fn register(&self, username: &str, password: &str) -> AuthResult<AuthenticatedUser> {
        let username = username.trim();
        if let Err(err) = validate_credentials(username, password) {
            warn!("event=auth_register module=auth status=rejected reason={}", err);
            return Err(err.into());
        }

        let mut records = self.store.load()?;
        if records.iter().any(|record| record.username == username) {
            warn!("event=auth_register module=auth status=rejected reason=duplicate_user");
            return Err(AuthError::DuplicateUser(username.to_string()));
        }

        records.push(UserRecord::new(username, password)?);
        self.store.save(&records)?;

        info!(
            "event=auth_register module=auth status=ok username_chars={} total_users={}",
            username.chars().count(),
            records.len()
        );
        Ok(AuthenticatedUser {
            username: username.to_string(),
        })
    }

    /// Verifies `password` against the stored digest for `username`.
    ///
    /// # Errors
    /// - `InvalidCredentials` for unknown usernames and wrong passwords alike.
    /// - `Storage` when the store cannot be read.
    pub fn login(&self, username: &str, password: &str) -> AuthResult<AuthenticatedUser> {
        let records = self.store.load()?;
        let matched = records
            .iter()
            .find(|record| record.username == username)
            .filter(|record| record.password_hash.matches(password));

        match matched {
            Some(record) => {
                info!("event=auth_login module=auth status=ok");
                Ok(AuthenticatedUser {
                    username: record.username.clone(),
                })
            }
            None => {
                warn!("event=auth_login module=auth status=rejected reason=invalid_credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
