//! Notebook state manager.
//!
//! # Responsibility
//! - Own the authoritative note and tag collections for the process.
//! - Expose the mutation operations and write every change through to storage.
//! - Recompute the derived view after each change to notes, tags, tag filter,
//!   search query or sort option.
//! - Queue user-facing confirmation notices.
//!
//! # Invariants
//! - Collections are only reachable through `&self` accessors; mutation goes
//!   through the operations below.
//! - Operations on unknown note/tag ids are silent no-ops returning `false`
//!   (or `None`) without writing to storage.
//! - A note never carries two tags with the same id.
//! - Deleting a tag strips it from every note and clears a matching filter.
//! - After a successful open both records exist in storage, so built-in
//!   samples keep their timestamps across reopen.

use crate::model::note::{dedup_tags, normalize_title, Note, NoteId};
use crate::model::sort::SortOption;
use crate::model::tag::{Tag, TagId};
use crate::model::time::{Clock, SystemClock, Timestamp};
use crate::repo::kv_repo::{KeyValueStore, StoreError};
use crate::repo::note_store::{generate_id_at, NoteStore};
use crate::service::view::derive_view;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NotebookResult<T> = Result<T, NotebookError>;

/// Error for notebook operations. Only persistence can fail.
#[derive(Debug)]
pub enum NotebookError {
    Store(StoreError),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "notebook persistence failed: {err}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for NotebookError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Transient confirmation raised by a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoteCreated { note_id: NoteId },
    NoteDeleted { note_id: NoteId },
    TagCreated { tag_id: TagId, name: String },
    TagDeleted { tag_id: TagId },
}

impl Notice {
    /// Short headline, e.g. `Note Created`.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NoteCreated { .. } => "Note Created",
            Self::NoteDeleted { .. } => "Note Deleted",
            Self::TagCreated { .. } => "Tag Created",
            Self::TagDeleted { .. } => "Tag Deleted",
        }
    }

    /// One-sentence description for display.
    pub fn description(&self) -> String {
        match self {
            Self::NoteCreated { .. } => "Your new note has been created successfully.".to_string(),
            Self::NoteDeleted { .. } => "Your note has been deleted.".to_string(),
            Self::TagCreated { name, .. } => format!("Tag \"{name}\" has been created."),
            Self::TagDeleted { .. } => "The tag has been deleted from all notes.".to_string(),
        }
    }
}

/// Single owner of notes, tags and the view inputs.
pub struct Notebook<S: KeyValueStore> {
    store: NoteStore<S>,
    clock: Box<dyn Clock>,
    notes: Vec<Note>,
    tags: Vec<Tag>,
    active_tag: Option<TagId>,
    search_query: String,
    sort_option: SortOption,
    view: Vec<Note>,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> Notebook<S> {
    /// Loads notes and tags from `kv` using the wall clock.
    pub fn open(kv: S) -> NotebookResult<Self> {
        Self::open_with_clock(kv, SystemClock)
    }

    /// Loads notes and tags from `kv`, stamping changes with `clock`.
    ///
    /// Absent records resolve to the built-in samples and default tags and
    /// both collections are then written through; malformed records fail
    /// with [`StoreError::CorruptRecord`].
    pub fn open_with_clock(kv: S, clock: impl Clock + 'static) -> NotebookResult<Self> {
        let store = NoteStore::new(kv);
        let seeded = !store.has_records()?;
        let notes = store.load_notes_or_samples(clock.now())?;
        let tags = store.load_tags()?;

        let mut notebook = Self {
            store,
            clock: Box::new(clock),
            notes,
            tags,
            active_tag: None,
            search_query: String::new(),
            sort_option: SortOption::default(),
            view: Vec::new(),
            notices: Vec::new(),
        };
        if seeded {
            notebook.persist_notes("notebook_open")?;
            notebook.persist_tags("notebook_open")?;
        }
        notebook.recompute();
        info!(
            "event=notebook_open module=notebook status=ok seeded={seeded} notes={} tags={}",
            notebook.notes.len(),
            notebook.tags.len()
        );
        Ok(notebook)
    }

    /// All notes in collection order (newest creations first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// All tags in creation order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Filtered, sorted, pinned-first projection of the notes.
    pub fn view(&self) -> &[Note] {
        &self.view
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == note_id)
    }

    pub fn tag(&self, tag_id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == tag_id)
    }

    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    /// Borrows the persistence adapter.
    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    /// Drains queued notices in the order they were raised.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Restricts the view to notes carrying `tag_id`, or lifts the filter.
    pub fn set_active_tag(&mut self, tag_id: Option<TagId>) {
        self.active_tag = tag_id;
        self.recompute();
    }

    /// Sets the case-insensitive substring filter. Empty disables it.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.recompute();
    }

    pub fn set_sort_option(&mut self, sort_option: SortOption) {
        self.sort_option = sort_option;
        self.recompute();
    }

    /// Inserts a blank "New Note" at the front of the collection.
    pub fn create_note(&mut self) -> NotebookResult<Note> {
        let now = self.now();
        let note_id = self.unique_note_id(now);
        let note = Note::new(note_id, now);
        self.notes.insert(0, note.clone());
        self.recompute();
        self.persist_notes("note_create")?;

        info!(
            "event=note_create module=notebook status=ok note_id={}",
            note.id
        );
        self.notices.push(Notice::NoteCreated {
            note_id: note.id.clone(),
        });
        Ok(note)
    }

    /// Replaces title, content, tags and pin flag of the note with `note.id`.
    ///
    /// The stored `created_at` is kept, the title is normalized, duplicate
    /// tag ids are dropped and `updated_at` is refreshed. Returns the stored
    /// snapshot, or `None` when no such note exists.
    pub fn update_note(&mut self, note: Note) -> NotebookResult<Option<Note>> {
        let now = self.now();
        let Some(stored) = self.notes.iter_mut().find(|stored| stored.id == note.id) else {
            debug!(
                "event=note_update module=notebook status=skipped reason=not_found note_id={}",
                note.id
            );
            return Ok(None);
        };

        stored.title = normalize_title(&note.title);
        stored.content = note.content;
        stored.tags = dedup_tags(note.tags);
        stored.pinned = note.pinned;
        stored.touch(now);
        let snapshot = stored.clone();

        self.recompute();
        self.persist_notes("note_update")?;
        info!(
            "event=note_update module=notebook status=ok note_id={} tags={}",
            snapshot.id,
            snapshot.tags.len()
        );
        Ok(Some(snapshot))
    }

    /// Removes the note with `note_id`. Returns whether a note was removed.
    pub fn delete_note(&mut self, note_id: &str) -> NotebookResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != note_id);
        if self.notes.len() == before {
            debug!(
                "event=note_delete module=notebook status=skipped reason=not_found note_id={note_id}"
            );
            return Ok(false);
        }

        self.recompute();
        self.persist_notes("note_delete")?;
        info!("event=note_delete module=notebook status=ok note_id={note_id}");
        self.notices.push(Notice::NoteDeleted {
            note_id: note_id.to_string(),
        });
        Ok(true)
    }

    /// Flips the pin flag without touching `updated_at`.
    pub fn toggle_pin(&mut self, note_id: &str) -> NotebookResult<bool> {
        let Some(note) = self.notes.iter_mut().find(|note| note.id == note_id) else {
            return Ok(false);
        };
        note.pinned = !note.pinned;
        let pinned = note.pinned;

        self.recompute();
        self.persist_notes("note_pin")?;
        info!("event=note_pin module=notebook status=ok note_id={note_id} pinned={pinned}");
        Ok(true)
    }

    /// Attaches a value copy of tag `tag_id` to note `note_id`.
    ///
    /// Returns `false` without changes when either id is unknown or the
    /// note already carries the tag.
    pub fn add_tag_to_note(&mut self, note_id: &str, tag_id: &str) -> NotebookResult<bool> {
        let Some(tag) = self.tag(tag_id).cloned() else {
            return Ok(false);
        };
        let now = self.now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == note_id) else {
            return Ok(false);
        };
        if note.has_tag(tag_id) {
            return Ok(false);
        }
        note.tags.push(tag);
        note.touch(now);

        self.recompute();
        self.persist_notes("note_tag_add")?;
        info!("event=note_tag_add module=notebook status=ok note_id={note_id} tag_id={tag_id}");
        Ok(true)
    }

    /// Detaches tag `tag_id` from note `note_id` and refreshes `updated_at`.
    ///
    /// `updated_at` is refreshed even when the tag was not attached.
    pub fn remove_tag_from_note(&mut self, note_id: &str, tag_id: &str) -> NotebookResult<bool> {
        let now = self.now();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == note_id) else {
            return Ok(false);
        };
        note.tags.retain(|tag| tag.id != tag_id);
        note.touch(now);

        self.recompute();
        self.persist_notes("note_tag_remove")?;
        info!(
            "event=note_tag_remove module=notebook status=ok note_id={note_id} tag_id={tag_id}"
        );
        Ok(true)
    }

    /// Appends a new tag. Existing notes are not affected.
    pub fn create_tag(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> NotebookResult<Tag> {
        let now = self.now();
        let tag = Tag::new(self.unique_tag_id(now), name, color);
        self.tags.push(tag.clone());
        self.recompute();
        self.persist_tags("tag_create")?;

        info!("event=tag_create module=notebook status=ok tag_id={}", tag.id);
        self.notices.push(Notice::TagCreated {
            tag_id: tag.id.clone(),
            name: tag.name.clone(),
        });
        Ok(tag)
    }

    /// Deletes tag `tag_id` and strips it from every note.
    ///
    /// Stripping does not refresh `updated_at`. A matching active filter is
    /// cleared. Returns `false` when neither the collection nor any note
    /// held the tag.
    pub fn delete_tag(&mut self, tag_id: &str) -> NotebookResult<bool> {
        let tags_before = self.tags.len();
        self.tags.retain(|tag| tag.id != tag_id);
        let removed_from_tags = self.tags.len() != tags_before;

        let mut stripped_notes = 0usize;
        for note in &mut self.notes {
            let before = note.tags.len();
            note.tags.retain(|tag| tag.id != tag_id);
            if note.tags.len() != before {
                stripped_notes += 1;
            }
        }

        if self.active_tag.as_deref() == Some(tag_id) {
            self.active_tag = None;
        }

        if !removed_from_tags && stripped_notes == 0 {
            self.recompute();
            return Ok(false);
        }

        self.recompute();
        self.persist_notes("tag_delete")?;
        self.persist_tags("tag_delete")?;
        info!(
            "event=tag_delete module=notebook status=ok tag_id={tag_id} stripped_notes={stripped_notes}"
        );
        self.notices.push(Notice::TagDeleted {
            tag_id: tag_id.to_string(),
        });
        Ok(true)
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn recompute(&mut self) {
        self.view = derive_view(
            &self.notes,
            self.active_tag.as_deref(),
            &self.search_query,
            self.sort_option,
        );
    }

    fn unique_note_id(&self, now: Timestamp) -> NoteId {
        loop {
            let candidate = generate_id_at("note", now);
            if self.note(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn unique_tag_id(&self, now: Timestamp) -> TagId {
        loop {
            let candidate = generate_id_at("tag", now);
            if self.tag(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn persist_notes(&mut self, event: &str) -> NotebookResult<()> {
        self.store.save_notes(&self.notes).map_err(|err| {
            error!(
                "event={event} module=notebook status=error error_code=notes_save_failed error={err}"
            );
            NotebookError::from(err)
        })
    }

    fn persist_tags(&mut self, event: &str) -> NotebookResult<()> {
        self.store.save_tags(&self.tags).map_err(|err| {
            error!(
                "event={event} module=notebook status=error error_code=tags_save_failed error={err}"
            );
            NotebookError::from(err)
        })
    }
}
