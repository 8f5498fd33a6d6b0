//! Core credential logic for QuickNote.
//! This crate owns the user store and login rules; UI layers only call into it.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, flush_logging, init_logging, logging_status, LogConfig, LoggingError,
};
pub use model::user::{CredentialValidationError, PasswordDigest, UserRecord};
pub use repo::user_repo::{CredentialStore, JsonCredentialStore, USERS_FILE_NAME};
pub use repo::{StoreError, StoreResult};
pub use service::auth_service::{AuthError, AuthResult, AuthService, AuthenticatedUser};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Text shown on the note home view after a successful login.
///
/// Notes themselves are not modelled yet; this is the placeholder view.
pub fn note_home_greeting(username: &str) -> String {
    format!("Welcome to QuickNote, {username}! Your notes will appear here.")
}
