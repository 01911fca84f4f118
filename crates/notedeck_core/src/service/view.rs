//! Derived note view: filter, sort, pinned-first partition.

use crate::model::note::Note;
use crate::model::sort::SortOption;

/// Projects the note collection into the list shown to the user.
///
/// Steps, in order:
/// 1. keep notes carrying `active_tag` (when set),
/// 2. keep notes whose title or content contains `query`, case-insensitively
///    (when non-empty),
/// 3. stable sort by `sort`,
/// 4. stable partition pinned notes ahead of unpinned ones.
///
/// Pure: the input collection is never modified.
pub fn derive_view(
    notes: &[Note],
    active_tag: Option<&str>,
    query: &str,
    sort: SortOption,
) -> Vec<Note> {
    let needle = query.to_lowercase();
    let mut filtered: Vec<Note> = notes
        .iter()
        .filter(|note| active_tag.map_or(true, |tag_id| note.has_tag(tag_id)))
        .filter(|note| needle.is_empty() || note.matches_query(&needle))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| sort.compare(a, b));

    let (mut pinned, unpinned): (Vec<Note>, Vec<Note>) =
        filtered.into_iter().partition(|note| note.pinned);
    pinned.extend(unpinned);
    pinned
}

#[cfg(test)]
mod tests {
    use super::derive_view;
    use crate::model::note::Note;
    use crate::model::sort::SortOption;
    use crate::model::tag::Tag;
    use crate::model::time::from_epoch_ms;

    fn note(id: &str, title: &str, created_ms: i64, updated_ms: i64) -> Note {
        let mut note = Note::new(id, from_epoch_ms(created_ms));
        note.title = title.to_string();
        note.updated_at = from_epoch_ms(updated_ms);
        note
    }

    fn ids(view: &[Note]) -> Vec<&str> {
        view.iter().map(|note| note.id.as_str()).collect()
    }

    #[test]
    fn alphabetical_folds_case() {
        let notes = vec![
            note("b", "Banana", 0, 0),
            note("a", "apple", 0, 0),
            note("c", "Cherry", 0, 0),
        ];
        let view = derive_view(&notes, None, "", SortOption::Alphabetical);
        assert_eq!(ids(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn every_sort_option_orders_by_its_key() {
        let notes = vec![
            note("old", "Beta", 1_000, 5_000),
            note("mid", "alpha", 2_000, 3_000),
            note("new", "Gamma", 3_000, 4_000),
        ];
        let cases = [
            (SortOption::CreatedNewest, vec!["new", "mid", "old"]),
            (SortOption::CreatedOldest, vec!["old", "mid", "new"]),
            (SortOption::UpdatedNewest, vec!["old", "new", "mid"]),
            (SortOption::UpdatedOldest, vec!["mid", "new", "old"]),
            (SortOption::Alphabetical, vec!["mid", "old", "new"]),
        ];
        for (sort, expected) in cases {
            let view = derive_view(&notes, None, "", sort);
            assert_eq!(ids(&view), expected, "sort option {sort}");
        }
    }

    #[test]
    fn pinned_notes_lead_for_every_sort_option() {
        let mut stale = note("stale", "Zulu", 0, 10);
        stale.pinned = true;
        let fresh = note("fresh", "Alpha", 500, 9_999);
        let notes = vec![fresh, stale];

        for sort in SortOption::ALL {
            let view = derive_view(&notes, None, "", sort);
            assert_eq!(view[0].id, "stale", "sort option {sort}");
        }
    }

    #[test]
    fn partition_keeps_sorted_order_within_groups() {
        let mut p1 = note("p1", "P1", 0, 100);
        p1.pinned = true;
        let mut p2 = note("p2", "P2", 0, 300);
        p2.pinned = true;
        let u1 = note("u1", "U1", 0, 200);
        let u2 = note("u2", "U2", 0, 400);
        let notes = vec![p1, u1, p2, u2];

        let view = derive_view(&notes, None, "", SortOption::UpdatedNewest);
        assert_eq!(ids(&view), vec!["p2", "p1", "u2", "u1"]);
    }

    #[test]
    fn tag_filter_and_query_combine() {
        let work = Tag::new("tag-2", "Work", "#f57187");
        let mut report = note("report", "Quarterly report", 0, 0);
        report.tags.push(work.clone());
        let mut standup = note("standup", "Standup", 0, 0);
        standup.tags.push(work);
        standup.content = "report blockers".to_string();
        let diary = note("diary", "Report card", 0, 0);
        let notes = vec![report, standup, diary];

        let tagged = derive_view(&notes, Some("tag-2"), "", SortOption::Alphabetical);
        assert_eq!(ids(&tagged), vec!["report", "standup"]);

        let searched = derive_view(&notes, None, "REPORT", SortOption::Alphabetical);
        assert_eq!(searched.len(), 3);

        let both = derive_view(&notes, Some("tag-2"), "blockers", SortOption::Alphabetical);
        assert_eq!(ids(&both), vec!["standup"]);
    }

    #[test]
    fn unknown_tag_filter_yields_empty_view() {
        let notes = vec![note("a", "A", 0, 0)];
        assert!(derive_view(&notes, Some("tag-missing"), "", SortOption::default()).is_empty());
    }
}
