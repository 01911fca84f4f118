//! Tag domain model.

use serde::{Deserialize, Serialize};

/// Stable identifier of a tag, e.g. `tag-1` or `tag-1718000000000-k3j9x0a`.
pub type TagId = String;

/// Named, colored label attachable to multiple notes.
///
/// Notes hold value copies of tags taken at attach time, not references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Hex color string such as `#9b87f5`. Not validated.
    pub color: String,
}

impl Tag {
    pub fn new(id: impl Into<TagId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}
