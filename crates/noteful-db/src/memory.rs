//! In-memory storage backend.
//!
//! Implements the same repository traits as the Postgres backend on top of
//! a single `RwLock`-guarded set of collections. Useful for local runs
//! without a database (`NOTEFUL_STORAGE=memory`) and for exercising the
//! HTTP layer in tests.
//!
//! ## Usage
//!
//! ```rust
//! use noteful_db::memory::MemoryStore;
//! use noteful_core::FolderRepository;
//!
//! # tokio_test_block_on(async {
//! let store = MemoryStore::new();
//! let folder = store.folders.create("Work").await.unwrap();
//! assert_eq!(store.folders.get(folder.id).await.unwrap(), Some(folder));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use noteful_core::{
    CascadeOutcome, Error, Folder, FolderRepository, Note, NoteFilter, NoteInput, NoteRepository,
    ObjectId, PopulatedNote, Result, Tag, TagRepository,
};

#[derive(Debug, Default)]
struct Collections {
    notes: HashMap<ObjectId, Note>,
    folders: HashMap<ObjectId, Folder>,
    tags: HashMap<ObjectId, Tag>,
}

impl Collections {
    fn populate(&self, note: &Note) -> PopulatedNote {
        note.clone().populate(|id| self.tags.get(id).cloned())
    }
}

type Shared = Arc<RwLock<Collections>>;

/// In-memory note, folder, and tag collections sharing one lock.
///
/// Clones share the same collections.
#[derive(Clone)]
pub struct MemoryStore {
    pub notes: MemoryNoteRepository,
    pub folders: MemoryFolderRepository,
    pub tags: MemoryTagRepository,
}

impl MemoryStore {
    pub fn new() -> Self {
        let shared: Shared = Arc::default();
        Self {
            notes: MemoryNoteRepository {
                inner: shared.clone(),
            },
            folders: MemoryFolderRepository {
                inner: shared.clone(),
            },
            tags: MemoryTagRepository { inner: shared },
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp for a write. Never earlier than `floor`, so `updated_at`
/// cannot run backwards on coarse clocks.
fn write_time(floor: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(floor)
}

// =============================================================================
// NOTES
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryNoteRepository {
    inner: Shared,
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self, filter: NoteFilter) -> Result<Vec<PopulatedNote>> {
        let db = self.inner.read().await;
        let mut notes: Vec<&Note> = db
            .notes
            .values()
            .filter(|n| filter.search_term().map_or(true, |t| n.matches_search(t)))
            .filter(|n| filter.folder_id.map_or(true, |f| n.folder_id == Some(f)))
            .filter(|n| filter.tag_id.map_or(true, |t| n.tags.contains(&t)))
            .collect();

        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(notes.into_iter().map(|n| db.populate(n)).collect())
    }

    async fn fetch(&self, id: ObjectId) -> Result<Option<PopulatedNote>> {
        let db = self.inner.read().await;
        Ok(db.notes.get(&id).map(|n| db.populate(n)))
    }

    async fn insert(&self, input: NoteInput) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: ObjectId::at(now),
            title: input.title,
            content: input.content,
            folder_id: input.folder_id,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn replace(&self, id: ObjectId, input: NoteInput) -> Result<Option<Note>> {
        let mut db = self.inner.write().await;
        let Some(note) = db.notes.get_mut(&id) else {
            return Ok(None);
        };
        note.title = input.title;
        note.content = input.content;
        note.folder_id = input.folder_id;
        note.tags = input.tags;
        note.updated_at = write_time(note.updated_at);
        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        Ok(self.inner.write().await.notes.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.notes.len() as i64)
    }
}

// =============================================================================
// FOLDERS
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryFolderRepository {
    inner: Shared,
}

#[async_trait]
impl FolderRepository for MemoryFolderRepository {
    async fn list(&self) -> Result<Vec<Folder>> {
        let db = self.inner.read().await;
        let mut folders: Vec<Folder> = db.folders.values().cloned().collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Folder>> {
        Ok(self.inner.read().await.folders.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Folder> {
        let mut db = self.inner.write().await;
        if db.folders.values().any(|f| f.name == name) {
            return Err(Error::duplicate_name("Folder"));
        }
        let now = Utc::now();
        let folder = Folder {
            id: ObjectId::at(now),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        db.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn rename(&self, id: ObjectId, name: &str) -> Result<Option<Folder>> {
        let mut db = self.inner.write().await;
        if db.folders.values().any(|f| f.name == name && f.id != id) {
            return Err(Error::duplicate_name("Folder"));
        }
        let Some(folder) = db.folders.get_mut(&id) else {
            return Ok(None);
        };
        folder.name = name.to_string();
        folder.updated_at = write_time(folder.updated_at);
        Ok(Some(folder.clone()))
    }

    async fn delete(&self, id: ObjectId) -> Result<CascadeOutcome> {
        let mut db = self.inner.write().await;

        let mut notes_updated = 0;
        for note in db.notes.values_mut().filter(|n| n.folder_id == Some(id)) {
            note.folder_id = None;
            notes_updated += 1;
        }
        let deleted = db.folders.remove(&id).is_some();

        info!(
            subsystem = "db",
            component = "folders",
            op = "delete",
            folder_id = %id,
            deleted,
            notes_updated,
            "Folder deleted"
        );
        Ok(CascadeOutcome {
            deleted,
            notes_updated,
        })
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.folders.len() as i64)
    }
}

// =============================================================================
// TAGS
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryTagRepository {
    inner: Shared,
}

#[async_trait]
impl TagRepository for MemoryTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let db = self.inner.read().await;
        let mut tags: Vec<Tag> = db.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Tag>> {
        Ok(self.inner.read().await.tags.get(&id).cloned())
    }

    async fn create(&self, name: &str) -> Result<Tag> {
        let mut db = self.inner.write().await;
        if db.tags.values().any(|t| t.name == name) {
            return Err(Error::duplicate_name("Tag"));
        }
        let now = Utc::now();
        let tag = Tag {
            id: ObjectId::at(now),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        db.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn rename(&self, id: ObjectId, name: &str) -> Result<Option<Tag>> {
        let mut db = self.inner.write().await;
        if db.tags.values().any(|t| t.name == name && t.id != id) {
            return Err(Error::duplicate_name("Tag"));
        }
        let Some(tag) = db.tags.get_mut(&id) else {
            return Ok(None);
        };
        tag.name = name.to_string();
        tag.updated_at = write_time(tag.updated_at);
        Ok(Some(tag.clone()))
    }

    async fn delete(&self, id: ObjectId) -> Result<CascadeOutcome> {
        let mut db = self.inner.write().await;

        let mut notes_updated = 0;
        for note in db.notes.values_mut().filter(|n| n.tags.contains(&id)) {
            note.tags.retain(|t| *t != id);
            notes_updated += 1;
        }
        let deleted = db.tags.remove(&id).is_some();

        info!(
            subsystem = "db",
            component = "tags",
            op = "delete",
            tag_id = %id,
            deleted,
            notes_updated,
            "Tag deleted"
        );
        Ok(CascadeOutcome {
            deleted,
            notes_updated,
        })
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.tags.len() as i64)
    }
}
