//! Plain-text rendering of notebook state.

use notedeck_core::{Note, Notice, Tag};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One line per note: pin marker, id, title, tag names, last update.
pub fn note_line(note: &Note) -> String {
    let pin = if note.pinned { "*" } else { " " };
    let tags = tag_names(&note.tags);
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!("  [{tags}]")
    };
    format!(
        "{pin} {}  {}{tags}  (updated {})",
        note.id,
        note.title,
        note.updated_at.format(TIME_FORMAT)
    )
}

/// Full note with header fields and body.
pub fn note_detail(note: &Note) -> String {
    let mut out = format!(
        "{}\nid:      {}\ncreated: {}\nupdated: {}\npinned:  {}\n",
        note.title,
        note.id,
        note.created_at.format(TIME_FORMAT),
        note.updated_at.format(TIME_FORMAT),
        if note.pinned { "yes" } else { "no" },
    );
    if !note.tags.is_empty() {
        out.push_str(&format!("tags:    {}\n", tag_names(&note.tags)));
    }
    if !note.content.is_empty() {
        out.push('\n');
        out.push_str(&note.content);
        out.push('\n');
    }
    out
}

pub fn tag_line(tag: &Tag) -> String {
    format!("{}  {}  {}", tag.id, tag.name, tag.color)
}

pub fn notice_line(notice: &Notice) -> String {
    format!("{}: {}", notice.title(), notice.description())
}

fn tag_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{note_detail, note_line};
    use notedeck_core::model::time::from_epoch_ms;
    use notedeck_core::{Note, Tag};

    #[test]
    fn note_line_marks_pinned_notes_and_lists_tags() {
        let mut note = Note::new("note-1", from_epoch_ms(0));
        note.pinned = true;
        note.tags.push(Tag::new("tag-1", "Personal", "#9b87f5"));
        let line = note_line(&note);
        assert!(line.starts_with("* note-1  New Note  [Personal]"));
    }

    #[test]
    fn note_detail_omits_empty_sections() {
        let note = Note::new("note-2", from_epoch_ms(0));
        let detail = note_detail(&note);
        assert!(detail.contains("pinned:  no"));
        assert!(!detail.contains("tags:"));
    }
}
