//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into controller-facing operations.
//! - Keep UI layers decoupled from storage details.

pub mod note_service;
