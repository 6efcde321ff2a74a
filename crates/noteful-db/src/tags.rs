//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use noteful_core::{CascadeOutcome, Error, ObjectId, Result, Tag, TagRepository};

use crate::integrity;
use crate::named::TAGS;

/// PostgreSQL implementation of TagRepository.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = TAGS.list(&self.pool).await?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn get(&self, id: ObjectId) -> Result<Option<Tag>> {
        Ok(TAGS.get(&self.pool, id).await?.map(Tag::from))
    }

    async fn create(&self, name: &str) -> Result<Tag> {
        TAGS.create(&self.pool, name).await.map(Tag::from)
    }

    async fn rename(&self, id: ObjectId, name: &str) -> Result<Option<Tag>> {
        Ok(TAGS.rename(&self.pool, id, name).await?.map(Tag::from))
    }

    async fn delete(&self, id: ObjectId) -> Result<CascadeOutcome> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Drop the tag from every note before it disappears
        let notes_updated = integrity::remove_tag_references(&mut tx, id).await?;
        let deleted = TAGS.delete_tx(&mut tx, id).await?;

        tx.commit().await.map_err(Error::Database)?;

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
        TAGS.count(&self.pool).await
    }
}
