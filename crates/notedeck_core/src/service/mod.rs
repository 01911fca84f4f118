//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory notebook state and its mutation operations.
//! - Project that state into the user-facing note view.
//! - Keep rendering layers decoupled from storage details.

pub mod notebook;
pub mod view;
