//! Repository traits for noteful's three resource collections.
//!
//! These traits define the interfaces that concrete storage backends
//! (Postgres, in-memory) must satisfy, so handlers can be exercised
//! without a database.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Folder, Note, PopulatedNote, Tag};
use crate::object_id::ObjectId;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Filters for listing notes. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    /// Case-insensitive substring matched against title or content.
    pub search_term: Option<String>,
    /// Only notes in this folder.
    pub folder_id: Option<ObjectId>,
    /// Only notes carrying this tag.
    pub tag_id: Option<ObjectId>,
}

impl NoteFilter {
    /// The search term, if present and not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|t| !t.is_empty())
    }
}

/// Full set of writable note fields, used for both create and replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteInput {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<ObjectId>,
    pub tags: Vec<ObjectId>,
}

/// Repository for note CRUD operations.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List notes matching `filter`, most recently updated first, tags expanded.
    async fn list(&self, filter: NoteFilter) -> Result<Vec<PopulatedNote>>;

    /// Fetch a note by id with tags expanded.
    async fn fetch(&self, id: ObjectId) -> Result<Option<PopulatedNote>>;

    /// Insert a new note.
    async fn insert(&self, input: NoteInput) -> Result<Note>;

    /// Replace every writable field of a note. Returns `None` when absent.
    async fn replace(&self, id: ObjectId, input: NoteInput) -> Result<Option<Note>>;

    /// Delete a note. Returns whether a note was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool>;

    /// Total number of notes.
    async fn count(&self) -> Result<i64>;
}

// =============================================================================
// FOLDER & TAG REPOSITORIES
// =============================================================================

/// Result of deleting a folder or tag together with its note references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Whether the folder or tag itself existed and was removed.
    pub deleted: bool,
    /// Number of notes whose references were cleaned up.
    pub notes_updated: u64,
}

/// Repository for folders. Names are unique.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// List all folders ordered by name.
    async fn list(&self) -> Result<Vec<Folder>>;

    /// Get a folder by id.
    async fn get(&self, id: ObjectId) -> Result<Option<Folder>>;

    /// Create a folder. Fails with `Error::Conflict` on a duplicate name.
    async fn create(&self, name: &str) -> Result<Folder>;

    /// Rename a folder. Fails with `Error::Conflict` on a duplicate name.
    async fn rename(&self, id: ObjectId, name: &str) -> Result<Option<Folder>>;

    /// Delete a folder and clear it from every note, atomically.
    async fn delete(&self, id: ObjectId) -> Result<CascadeOutcome>;

    /// Total number of folders.
    async fn count(&self) -> Result<i64>;
}

/// Repository for tags. Names are unique.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Get a tag by id.
    async fn get(&self, id: ObjectId) -> Result<Option<Tag>>;

    /// Create a tag. Fails with `Error::Conflict` on a duplicate name.
    async fn create(&self, name: &str) -> Result<Tag>;

    /// Rename a tag. Fails with `Error::Conflict` on a duplicate name.
    async fn rename(&self, id: ObjectId, name: &str) -> Result<Option<Tag>>;

    /// Delete a tag and remove it from every note's tag list, atomically.
    async fn delete(&self, id: ObjectId) -> Result<CascadeOutcome>;

    /// Total number of tags.
    async fn count(&self) -> Result<i64>;
}
