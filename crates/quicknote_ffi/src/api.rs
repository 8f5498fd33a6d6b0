//! FFI use-case API for the login gate UI.
//!
//! # Responsibility
//! - Expose register/login as envelope-returning calls for Dart via FRB.
//! - Resolve the data directory that holds `users.json`.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported in the envelope, never as panics or exceptions.

use log::warn;
use quicknote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    note_home_greeting as note_home_greeting_inner, AuthError, AuthService, AuthenticatedUser,
    JsonCredentialStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DATA_DIR_ENV: &str = "QUICKNOTE_DATA_DIR";
const DEFAULT_DATA_DIR_NAME: &str = "quicknote";
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Result envelope for register/login calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Stored username on success (trimmed for registrations).
    pub username: Option<String>,
    /// `validation|duplicate_user|invalid_credentials|storage` on failure.
    pub error_kind: Option<String>,
    /// Human-readable message for a blocking UI notification.
    pub message: String,
}

impl AuthResponse {
    fn success(message: impl Into<String>, user: AuthenticatedUser) -> Self {
        Self {
            ok: true,
            username: Some(user.username),
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(err: &AuthError) -> Self {
        Self {
            ok: false,
            username: None,
            error_kind: Some(err.kind().to_string()),
            message: user_message(err),
        }
    }
}

/// Registers a new account.
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(username: String, password: String) -> AuthResponse {
    match auth_service().register(&username, &password) {
        Ok(user) => AuthResponse::success("Registration successful.", user),
        Err(err) => {
            warn!("event=ffi_auth_register module=ffi status=error kind={}", err.kind());
            AuthResponse::failure(&err)
        }
    }
}

/// Verifies credentials for the login gate.
///
/// # FFI contract
/// - Sync call, file-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(username: String, password: String) -> AuthResponse {
    match auth_service().login(&username, &password) {
        Ok(user) => AuthResponse::success("Login successful.", user),
        Err(err) => {
            warn!("event=ffi_auth_login module=ffi status=error kind={}", err.kind());
            AuthResponse::failure(&err)
        }
    }
}

/// Text for the note home view shown after login.
#[flutter_rust_bridge::frb(sync)]
pub fn note_home_greeting(username: String) -> String {
    note_home_greeting_inner(username.as_str())
}

fn user_message(err: &AuthError) -> String {
    match err {
        AuthError::Validation(_) => "Username and password must not be empty.".to_string(),
        AuthError::DuplicateUser(_) => "This username already exists.".to_string(),
        AuthError::InvalidCredentials => "Wrong username or password.".to_string(),
        AuthError::Storage(_) => "User data could not be read or saved.".to_string(),
    }
}

fn auth_service() -> AuthService<JsonCredentialStore> {
    AuthService::new(JsonCredentialStore::in_dir(resolve_data_dir()))
}

fn resolve_data_dir() -> PathBuf {
    DATA_DIR
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DATA_DIR_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME)
        })
        .clone()
}
