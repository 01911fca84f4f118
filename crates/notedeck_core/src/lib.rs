//! Core domain logic for NoteDeck.
//! This crate is the single source of truth for note/tag invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, NotebookConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NEW_NOTE_TITLE, UNTITLED_TITLE};
pub use model::sort::{compare_titles, ParseSortOptionError, SortOption};
pub use model::tag::{Tag, TagId};
pub use model::time::{Clock, SystemClock, Timestamp};
pub use repo::kv_repo::{KeyValueStore, MemoryStore, SqliteKvStore, StoreError, StoreResult};
pub use repo::note_store::{generate_id, NoteStore, NOTES_KEY, TAGS_KEY};
pub use service::notebook::{Notebook, NotebookError, NotebookResult, Notice};
pub use service::view::derive_view;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
