//! Domain model for notes, tags and view ordering.
//!
//! # Responsibility
//! - Define the canonical note/tag records shared by storage and state layers.
//! - Define the sort options understood by the view projection.
//! - Provide the clock abstraction used for note timestamps.
//!
//! # Invariants
//! - Note and tag ids are unique within their owning collection.
//! - A note's `updated_at` is never earlier than its `created_at`.

pub mod note;
pub mod sort;
pub mod tag;
pub mod time;
