//! Credential domain model.
//!
//! # Responsibility
//! - Define the canonical user record persisted by the credential store.
//!
//! # Invariants
//! - Usernames are unique per store.
//! - Only password digests are stored, never plaintext.

pub mod user;
