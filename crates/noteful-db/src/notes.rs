//! Note repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use noteful_core::{
    Error, Note, NoteFilter, NoteInput, NoteRepository, ObjectId, PopulatedNote, Result, Tag,
};

use crate::named::TAGS;
use crate::{escape_like, parse_stored_id};

const NOTE_COLUMNS: &str = "id, title, content, folder_id, tag_ids, created_at, updated_at";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn note_from_row(row: &PgRow) -> Result<Note> {
        let folder_id: Option<&str> = row.get("folder_id");
        let tag_ids: Vec<String> = row.get("tag_ids");

        Ok(Note {
            id: parse_stored_id(row.get("id"))?,
            title: row.get("title"),
            content: row.get("content"),
            folder_id: folder_id.map(parse_stored_id).transpose()?,
            tags: tag_ids
                .iter()
                .map(|t| parse_stored_id(t))
                .collect::<Result<_>>()?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Expand tag references for a batch of notes with a single tag query.
    async fn populate(&self, notes: Vec<Note>) -> Result<Vec<PopulatedNote>> {
        let mut wanted: Vec<ObjectId> = notes
            .iter()
            .flat_map(|n| n.tags.iter().copied())
            .collect();
        wanted.sort_unstable();
        wanted.dedup();

        let tags: HashMap<ObjectId, Tag> = TAGS
            .list_by_ids(&self.pool, &wanted)
            .await?
            .into_iter()
            .map(Tag::from)
            .map(|t| (t.id, t))
            .collect();

        Ok(notes
            .into_iter()
            .map(|n| n.populate(|id| tags.get(id).cloned()))
            .collect())
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, filter: NoteFilter) -> Result<Vec<PopulatedNote>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut param_idx = 1;

        if filter.search_term().is_some() {
            clauses.push(format!("(title ILIKE ${0} OR content ILIKE ${0})", param_idx));
            param_idx += 1;
        }
        if filter.folder_id.is_some() {
            clauses.push(format!("folder_id = ${}", param_idx));
            param_idx += 1;
        }
        if filter.tag_id.is_some() {
            clauses.push(format!("${} = ANY(tag_ids)", param_idx));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {} FROM note {} ORDER BY updated_at DESC, id DESC",
            NOTE_COLUMNS, where_clause
        );

        let mut q = sqlx::query(&sql);
        if let Some(term) = filter.search_term() {
            q = q.bind(format!("%{}%", escape_like(term)));
        }
        if let Some(folder_id) = filter.folder_id {
            q = q.bind(folder_id.to_hex());
        }
        if let Some(tag_id) = filter.tag_id {
            q = q.bind(tag_id.to_hex());
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        let notes = rows
            .iter()
            .map(Self::note_from_row)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "list",
            search = filter.search_term().is_some(),
            folder_id = ?filter.folder_id,
            tag_id = ?filter.tag_id,
            result_count = notes.len(),
            "Listed notes"
        );

        self.populate(notes).await
    }

    async fn fetch(&self, id: ObjectId) -> Result<Option<PopulatedNote>> {
        let sql = format!("SELECT {} FROM note WHERE id = $1", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => {
                let note = Self::note_from_row(&row)?;
                Ok(self.populate(vec![note]).await?.pop())
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, input: NoteInput) -> Result<Note> {
        let now = Utc::now();
        let tag_ids: Vec<String> = input.tags.iter().map(ObjectId::to_hex).collect();

        let sql = format!(
            "INSERT INTO note (id, title, content, folder_id, tag_ids, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(ObjectId::at(now).to_hex())
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.folder_id.map(|f| f.to_hex()))
            .bind(tag_ids)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Self::note_from_row(&row)
    }

    async fn replace(&self, id: ObjectId, input: NoteInput) -> Result<Option<Note>> {
        let tag_ids: Vec<String> = input.tags.iter().map(ObjectId::to_hex).collect();

        let sql = format!(
            "UPDATE note
             SET title = $2, content = $3, folder_id = $4, tag_ids = $5, updated_at = $6
             WHERE id = $1
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.to_hex())
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.folder_id.map(|f| f.to_hex()))
            .bind(tag_ids)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(Self::note_from_row).transpose()
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id.to_hex())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM note")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
