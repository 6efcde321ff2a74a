//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use noteful_core::{CascadeOutcome, Error, Folder, FolderRepository, ObjectId, Result};

use crate::integrity;
use crate::named::FOLDERS;

/// PostgreSQL implementation of FolderRepository.
#[derive(Clone)]
pub struct PgFolderRepository {
    pool: Pool<Postgres>,
}

impl PgFolderRepository {
    /// Create a new PgFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn list(&self) -> Result<Vec<Folder>> {
        let rows = FOLDERS.list(&self.pool).await?;
        Ok(rows.into_iter().map(Folder::from).collect())
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Folder>> {
        Ok(FOLDERS.get(&self.pool, id).await?.map(Folder::from))
    }

    async fn create(&self, name: &str) -> Result<Folder> {
        FOLDERS.create(&self.pool, name).await.map(Folder::from)
    }

    async fn rename(&self, id: ObjectId, name: &str) -> Result<Option<Folder>> {
        Ok(FOLDERS.rename(&self.pool, id, name).await?.map(Folder::from))
    }

    async fn delete(&self, id: ObjectId) -> Result<CascadeOutcome> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Move notes out of the folder before it disappears
        let notes_updated = integrity::clear_folder_references(&mut tx, id).await?;
        let deleted = FOLDERS.delete_tx(&mut tx, id).await?;

        tx.commit().await.map_err(Error::Database)?;

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
        FOLDERS.count(&self.pool).await
    }
}
