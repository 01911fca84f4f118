//! Note domain model.
//!
//! # Invariants
//! - `created_at` is fixed at creation and never rewritten.
//! - `tags` holds at most one entry per tag id.
//! - `updated_at >= created_at`.

use crate::model::tag::{Tag, TagId};
use crate::model::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Stable identifier of a note, e.g. `note-1` or `note-1718000000000-k3j9x0a`.
pub type NoteId = String;

/// Title given to freshly created notes.
pub const NEW_NOTE_TITLE: &str = "New Note";

/// Title substituted when a note is saved with a blank title.
pub const UNTITLED_TITLE: &str = "Untitled";

/// Titled block of free-text content with tags, timestamps and a pin flag.
///
/// Serialized with camelCase keys (`createdAt`, `updatedAt`) to keep the
/// persisted record layout stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Value copies of the attached tags, in attach order.
    pub tags: Vec<Tag>,
    pub pinned: bool,
}

impl Note {
    /// Creates an empty, unpinned, untagged note stamped with `now`.
    pub fn new(id: impl Into<NoteId>, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            title: NEW_NOTE_TITLE.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            pinned: false,
        }
    }

    /// Returns whether a tag with `tag_id` is attached.
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }

    /// Refreshes `updated_at`, clamped so it never precedes `created_at`.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now.max(self.created_at);
    }

    /// Returns whether title or content contains `needle_lower`.
    ///
    /// `needle_lower` must already be lowercased by the caller.
    pub fn matches_query(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}

/// Normalizes a title for saving: trimmed, blank becomes [`UNTITLED_TITLE`].
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Drops later duplicates of the same tag id, keeping first-attach order.
pub fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen: Vec<TagId> = Vec::with_capacity(tags.len());
    let mut unique = Vec::with_capacity(tags.len());
    for tag in tags {
        if seen.contains(&tag.id) {
            continue;
        }
        seen.push(tag.id.clone());
        unique.push(tag);
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{dedup_tags, normalize_title, Note};
    use crate::model::tag::Tag;
    use crate::model::time::from_epoch_ms;

    #[test]
    fn normalize_title_trims_and_falls_back_to_untitled() {
        assert_eq!(normalize_title("  Groceries "), "Groceries");
        assert_eq!(normalize_title("   "), "Untitled");
        assert_eq!(normalize_title(""), "Untitled");
    }

    #[test]
    fn dedup_tags_keeps_first_occurrence() {
        let tags = vec![
            Tag::new("tag-1", "Personal", "#111111"),
            Tag::new("tag-2", "Work", "#222222"),
            Tag::new("tag-1", "Personal (stale)", "#333333"),
        ];
        let unique = dedup_tags(tags);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "Personal");
        assert_eq!(unique[1].id, "tag-2");
    }

    #[test]
    fn touch_never_moves_updated_at_before_created_at() {
        let mut note = Note::new("note-x", from_epoch_ms(5_000));
        note.touch(from_epoch_ms(1_000));
        assert_eq!(note.updated_at, note.created_at);
        note.touch(from_epoch_ms(9_000));
        assert_eq!(note.updated_at, from_epoch_ms(9_000));
    }

    #[test]
    fn matches_query_checks_title_and_content() {
        let mut note = Note::new("note-x", from_epoch_ms(0));
        note.title = "Shopping List".to_string();
        note.content = "- Milk".to_string();
        assert!(note.matches_query("shop"));
        assert!(note.matches_query("milk"));
        assert!(!note.matches_query("bread"));
    }
}
