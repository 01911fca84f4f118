//! Sort options for the derived note view.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::note::Note;

/// Ordering applied to the derived view before the pinned-first partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// `created_at` descending.
    CreatedNewest,
    /// `created_at` ascending.
    CreatedOldest,
    /// `updated_at` descending.
    #[default]
    UpdatedNewest,
    /// `updated_at` ascending.
    UpdatedOldest,
    /// Title ascending, see [`compare_titles`].
    Alphabetical,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        Self::CreatedNewest,
        Self::CreatedOldest,
        Self::UpdatedNewest,
        Self::UpdatedOldest,
        Self::Alphabetical,
    ];

    /// Stable external name, e.g. `updated-newest`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedNewest => "created-newest",
            Self::CreatedOldest => "created-oldest",
            Self::UpdatedNewest => "updated-newest",
            Self::UpdatedOldest => "updated-oldest",
            Self::Alphabetical => "alphabetical",
        }
    }

    /// Compares two notes under this option.
    pub fn compare(self, a: &Note, b: &Note) -> Ordering {
        match self {
            Self::CreatedNewest => b.created_at.cmp(&a.created_at),
            Self::CreatedOldest => a.created_at.cmp(&b.created_at),
            Self::UpdatedNewest => b.updated_at.cmp(&a.updated_at),
            Self::UpdatedOldest => a.updated_at.cmp(&b.updated_at),
            Self::Alphabetical => compare_titles(&a.title, &b.title),
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unknown sort option names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortOptionError(String);

impl Display for ParseSortOptionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported sort option `{}`; expected created-newest|created-oldest|updated-newest|updated-oldest|alphabetical",
            self.0
        )
    }
}

impl Error for ParseSortOptionError {}

impl FromStr for SortOption {
    type Err = ParseSortOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == normalized)
            .ok_or(ParseSortOptionError(normalized))
    }
}

/// Title collation for [`SortOption::Alphabetical`].
///
/// Titles compare by their Unicode lowercase form; equal folds fall back to
/// code-point order of the raw titles so the result is total and deterministic.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::{compare_titles, SortOption};
    use std::cmp::Ordering;

    #[test]
    fn parses_every_external_name() {
        for option in SortOption::ALL {
            assert_eq!(option.as_str().parse::<SortOption>().unwrap(), option);
        }
        assert_eq!(
            " Updated-Oldest ".parse::<SortOption>().unwrap(),
            SortOption::UpdatedOldest
        );
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "newest".parse::<SortOption>().unwrap_err();
        assert!(err.to_string().contains("unsupported sort option"));
    }

    #[test]
    fn default_is_updated_newest() {
        assert_eq!(SortOption::default(), SortOption::UpdatedNewest);
    }

    #[test]
    fn title_collation_folds_case_then_breaks_ties() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("Banana", "Cherry"), Ordering::Less);
        assert_eq!(compare_titles("Apple", "apple"), Ordering::Less);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn serde_uses_kebab_case_names() {
        let json = serde_json::to_string(&SortOption::CreatedOldest).unwrap();
        assert_eq!(json, "\"created-oldest\"");
    }
}
