//! Note/tag record adapter over a [`KeyValueStore`].
//!
//! # Responsibility
//! - Load and save the note and tag collections as JSON records.
//! - Supply the built-in sample notes and default tags for an empty store.
//! - Generate prefixed unique identifiers.
//!
//! # Invariants
//! - An absent record yields defaults; a present but undecodable record is
//!   reported as [`StoreError::CorruptRecord`].
//! - Loaded collections never hold two entries with the same id. Repeated
//!   tags on one note are dropped and `updatedAt` is clamped to `createdAt`.
//! - Saving overwrites the whole record; there is no partial write.

use crate::model::note::{dedup_tags, Note};
use crate::model::tag::Tag;
use crate::model::time::{Clock, SystemClock, Timestamp};
use crate::repo::kv_repo::{KeyValueStore, StoreError, StoreResult};
use chrono::Duration;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// Key of the notes record.
pub const NOTES_KEY: &str = "notes-app-notes";
/// Key of the tags record.
pub const TAGS_KEY: &str = "notes-app-tags";

const ID_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Persistence adapter for the note and tag collections.
pub struct NoteStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> NoteStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns persisted notes, or the sample set stamped relative to wall-clock now.
    pub fn load_notes(&self) -> StoreResult<Vec<Note>> {
        self.load_notes_or_samples(SystemClock.now())
    }

    /// Returns persisted notes, or the sample set stamped relative to `now`.
    pub fn load_notes_or_samples(&self, now: Timestamp) -> StoreResult<Vec<Note>> {
        match self.load_record::<Vec<Note>>(NOTES_KEY)? {
            Some(notes) => {
                let notes = check_notes(notes)?;
                info!(
                    "event=notes_load module=repo status=ok source=stored count={}",
                    notes.len()
                );
                Ok(notes)
            }
            None => {
                let notes = sample_notes(now);
                info!(
                    "event=notes_load module=repo status=ok source=defaults count={}",
                    notes.len()
                );
                Ok(notes)
            }
        }
    }

    /// Overwrites the notes record.
    pub fn save_notes(&mut self, notes: &[Note]) -> StoreResult<()> {
        self.save_record(NOTES_KEY, notes)
    }

    /// Returns persisted tags, or the three default tags.
    pub fn load_tags(&self) -> StoreResult<Vec<Tag>> {
        match self.load_record::<Vec<Tag>>(TAGS_KEY)? {
            Some(tags) => {
                ensure_unique_ids(TAGS_KEY, tags.iter().map(|tag| tag.id.as_str()))?;
                info!(
                    "event=tags_load module=repo status=ok source=stored count={}",
                    tags.len()
                );
                Ok(tags)
            }
            None => {
                let tags = default_tags();
                info!(
                    "event=tags_load module=repo status=ok source=defaults count={}",
                    tags.len()
                );
                Ok(tags)
            }
        }
    }

    /// Overwrites the tags record.
    pub fn save_tags(&mut self, tags: &[Tag]) -> StoreResult<()> {
        self.save_record(TAGS_KEY, tags)
    }

    /// Returns whether both the notes and the tags record are present.
    pub fn has_records(&self) -> StoreResult<bool> {
        Ok(self.kv.get(NOTES_KEY)?.is_some() && self.kv.get(TAGS_KEY)?.is_some())
    }

    /// Borrows the underlying key-value store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Releases the underlying key-value store.
    pub fn into_inner(self) -> S {
        self.kv
    }

    fn load_record<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|err| {
            warn!(
                "event=record_load module=repo status=error key={key} error_code=corrupt_record line={} column={}",
                err.line(),
                err.column()
            );
            StoreError::CorruptRecord {
                key: key.to_string(),
                message: err.to_string(),
            }
        })
    }

    fn save_record<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        let encoded =
            serde_json::to_string(value).map_err(|err| StoreError::Serialize(err.to_string()))?;
        self.kv.set(key, &encoded)
    }
}

fn check_notes(notes: Vec<Note>) -> StoreResult<Vec<Note>> {
    ensure_unique_ids(NOTES_KEY, notes.iter().map(|note| note.id.as_str()))?;

    let mut repaired = 0usize;
    let notes = notes
        .into_iter()
        .map(|mut note| {
            let tag_count = note.tags.len();
            note.tags = dedup_tags(note.tags);
            let clamped = note.updated_at < note.created_at;
            if clamped {
                note.updated_at = note.created_at;
            }
            if clamped || note.tags.len() != tag_count {
                repaired += 1;
            }
            note
        })
        .collect();

    if repaired > 0 {
        warn!("event=notes_load module=repo status=repaired key={NOTES_KEY} notes={repaired}");
    }
    Ok(notes)
}

fn ensure_unique_ids<'a>(key: &str, ids: impl Iterator<Item = &'a str>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warn!("event=record_load module=repo status=error key={key} error_code=duplicate_id");
            return Err(StoreError::CorruptRecord {
                key: key.to_string(),
                message: format!("duplicate id `{id}`"),
            });
        }
    }
    Ok(())
}

/// Built-in tags returned when no tags record exists.
pub fn default_tags() -> Vec<Tag> {
    Vec::from(default_tag_array())
}

/// Built-in notes returned when no notes record exists.
///
/// One pinned welcome note stamped `now`, a shopping list one day older and
/// a project ideas note two days older.
pub fn sample_notes(now: Timestamp) -> Vec<Note> {
    let [personal, work, ideas] = default_tag_array();
    let one_day_ago = now - Duration::days(1);
    let two_days_ago = now - Duration::days(2);

    vec![
        Note {
            id: "note-1".to_string(),
            title: "Welcome to Notes App".to_string(),
            content: "This is your new notes app! Create, edit, and organize your notes easily."
                .to_string(),
            created_at: now,
            updated_at: now,
            tags: vec![personal.clone()],
            pinned: true,
        },
        Note {
            id: "note-2".to_string(),
            title: "Shopping List".to_string(),
            content: "- Milk\n- Eggs\n- Bread\n- Fruits".to_string(),
            created_at: one_day_ago,
            updated_at: one_day_ago,
            tags: vec![personal],
            pinned: false,
        },
        Note {
            id: "note-3".to_string(),
            title: "Project Ideas".to_string(),
            content: "1. Mobile app for task management\n2. Web app for note taking\n3. E-commerce platform"
                .to_string(),
            created_at: two_days_ago,
            updated_at: two_days_ago,
            tags: vec![work, ideas],
            pinned: false,
        },
    ]
}

fn default_tag_array() -> [Tag; 3] {
    [
        Tag::new("tag-1", "Personal", "#9b87f5"),
        Tag::new("tag-2", "Work", "#f57187"),
        Tag::new("tag-3", "Ideas", "#87f5b3"),
    ]
}

/// Generates `{prefix}-{epoch_ms}-{suffix}` using wall-clock now.
pub fn generate_id(prefix: &str) -> String {
    generate_id_at(prefix, SystemClock.now())
}

/// Generates `{prefix}-{epoch_ms}-{suffix}` for the given instant.
///
/// The 7-char base-36 suffix comes from a v4 UUID. Collisions are unlikely
/// but not prevented here; owners of a collection re-draw on conflict.
pub fn generate_id_at(prefix: &str, now: Timestamp) -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        suffix.push(char::from(BASE36_DIGITS[(entropy % 36) as usize]));
        entropy /= 36;
    }
    format!("{prefix}-{}-{suffix}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::{default_tags, generate_id, generate_id_at, sample_notes};
    use crate::model::time::from_epoch_ms;

    #[test]
    fn generated_id_has_prefix_time_and_suffix() {
        let id = generate_id_at("note", from_epoch_ms(1_700_000_000_123));
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "note");
        assert_eq!(parts[1], "1700000000123");
        assert_eq!(parts[2].len(), 7);
        assert!(parts[2]
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase()));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_id("tag"), generate_id("tag"));
    }

    #[test]
    fn sample_notes_reference_default_tags_by_value() {
        let tags = default_tags();
        let notes = sample_notes(from_epoch_ms(1_000_000_000_000));
        assert_eq!(notes[0].tags, vec![tags[0].clone()]);
        assert_eq!(notes[2].tags, vec![tags[1].clone(), tags[2].clone()]);
        assert!(notes[1].created_at < notes[0].created_at);
        assert!(notes[2].created_at < notes[1].created_at);
    }
}
