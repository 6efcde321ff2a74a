//! Shared queries for the uniquely-named tables (`folder`, `tag`).

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};

use noteful_core::{Error, Folder, ObjectId, Result, Tag};

use crate::parse_stored_id;

/// Row shape shared by folders and tags.
pub(crate) struct NamedRow {
    id: ObjectId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NamedRow {
    fn from_row(row: &PgRow) -> Result<Self> {
        Ok(Self {
            id: parse_stored_id(row.get("id"))?,
            name: row.get("name"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

impl From<NamedRow> for Folder {
    fn from(r: NamedRow) -> Self {
        Folder {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<NamedRow> for Tag {
    fn from(r: NamedRow) -> Self {
        Tag {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub(crate) const FOLDERS: NamedTable = NamedTable {
    table: "folder",
    resource: "Folder",
    name_constraint: "folder_name_key",
};

pub(crate) const TAGS: NamedTable = NamedTable {
    table: "tag",
    resource: "Tag",
    name_constraint: "tag_name_key",
};

/// A table with a unique `name` column.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NamedTable {
    /// SQL table name. Always a static identifier, never user input.
    pub table: &'static str,
    /// Resource label used in conflict messages ("Folder", "Tag").
    pub resource: &'static str,
    /// Unique constraint on `name`, as declared in the migration.
    pub name_constraint: &'static str,
}

impl NamedTable {
    fn conflict_or(&self, err: sqlx::Error) -> Error {
        let err = Error::Database(err);
        if err.is_unique_violation_on(self.name_constraint) {
            Error::duplicate_name(self.resource)
        } else {
            err
        }
    }

    pub async fn list(&self, pool: &Pool<Postgres>) -> Result<Vec<NamedRow>> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} ORDER BY name ASC",
            self.table
        );
        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(Error::Database)?;
        rows.iter().map(NamedRow::from_row).collect()
    }

    pub async fn list_by_ids(
        &self,
        pool: &Pool<Postgres>,
        ids: &[ObjectId],
    ) -> Result<Vec<NamedRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE id = ANY($1)",
            self.table
        );
        let hex_ids: Vec<String> = ids.iter().map(ObjectId::to_hex).collect();
        let rows = sqlx::query(&sql)
            .bind(hex_ids)
            .fetch_all(pool)
            .await
            .map_err(Error::Database)?;
        rows.iter().map(NamedRow::from_row).collect()
    }

    pub async fn get(&self, pool: &Pool<Postgres>, id: ObjectId) -> Result<Option<NamedRow>> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE id = $1",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.to_hex())
            .fetch_optional(pool)
            .await
            .map_err(Error::Database)?;
        row.as_ref().map(NamedRow::from_row).transpose()
    }

    pub async fn create(&self, pool: &Pool<Postgres>, name: &str) -> Result<NamedRow> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} (id, name, created_at, updated_at) VALUES ($1, $2, $3, $3)
             RETURNING id, name, created_at, updated_at",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(ObjectId::at(now).to_hex())
            .bind(name)
            .bind(now)
            .fetch_one(pool)
            .await
            .map_err(|e| self.conflict_or(e))?;
        NamedRow::from_row(&row)
    }

    pub async fn rename(
        &self,
        pool: &Pool<Postgres>,
        id: ObjectId,
        name: &str,
    ) -> Result<Option<NamedRow>> {
        let sql = format!(
            "UPDATE {} SET name = $2, updated_at = $3 WHERE id = $1
             RETURNING id, name, created_at, updated_at",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.to_hex())
            .bind(name)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
            .map_err(|e| self.conflict_or(e))?;
        row.as_ref().map(NamedRow::from_row).transpose()
    }

    pub async fn delete_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: ObjectId,
    ) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id.to_hex())
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self, pool: &Pool<Postgres>) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(pool)
            .await
            .map_err(Error::Database)
    }
}
