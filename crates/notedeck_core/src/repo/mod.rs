//! Persistence layer: key-value backends and the note/tag record adapter.
//!
//! # Responsibility
//! - Define the key-value contract standing in for local browser storage.
//! - Serialize note and tag collections into their persisted records.
//!
//! # Invariants
//! - Read paths reject malformed records instead of masking them.
//! - Absent records resolve to built-in defaults.

pub mod kv_repo;
pub mod note_store;
