//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate credential store calls into register/login use-cases.
//! - Keep presentation layers decoupled from storage details.

pub mod auth_service;
