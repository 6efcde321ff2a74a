//! Resource models: notes, folders, and tags.
//!
//! All models serialize with camelCase field names and expose only the
//! identifier, domain fields, and the two timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;

// =============================================================================
// FOLDERS & TAGS
// =============================================================================

/// A named folder. Notes reference at most one folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: ObjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named tag. Notes reference any number of tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: ObjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// NOTES
// =============================================================================

/// A note.
///
/// `T` is the representation of tag references: bare identifiers as stored
/// ([`ObjectId`], the default) or expanded [`Tag`] objects as returned by
/// list and get (see [`PopulatedNote`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note<T = ObjectId> {
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<ObjectId>,
    #[serde(default)]
    pub tags: Vec<T>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note whose tag references have been expanded to full tags.
pub type PopulatedNote = Note<Tag>;

impl Note {
    /// Expand tag references using `lookup`. References that resolve to no
    /// tag are dropped; the order of the stored list is kept.
    pub fn populate<F>(self, mut lookup: F) -> PopulatedNote
    where
        F: FnMut(&ObjectId) -> Option<Tag>,
    {
        let tags = self.tags.iter().filter_map(|id| lookup(id)).collect();
        Note {
            id: self.id,
            title: self.title,
            content: self.content,
            folder_id: self.folder_id,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<T> Note<T> {
    /// Whether the note's title or content contains `term`, ignoring case.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .content
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
    }
}
