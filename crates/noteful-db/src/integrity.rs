//! Referential integrity for note references.
//!
//! Notes hold weak references to one folder and many tags. When a folder or
//! tag is deleted, these helpers clean the references out of every note.
//! They run inside the caller's transaction so the cleanup and the parent
//! delete commit or roll back together.

use sqlx::{Postgres, Transaction};
use tracing::debug;

use noteful_core::{Error, ObjectId, Result};

/// Unset `folder_id` on every note in `folder_id`. Returns the number of notes updated.
pub async fn clear_folder_references(
    tx: &mut Transaction<'_, Postgres>,
    folder_id: ObjectId,
) -> Result<u64> {
    let result = sqlx::query("UPDATE note SET folder_id = NULL WHERE folder_id = $1")
        .bind(folder_id.to_hex())
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    debug!(
        subsystem = "db",
        component = "integrity",
        op = "clear_folder",
        folder_id = %folder_id,
        notes_updated = result.rows_affected(),
        "Cleared folder references"
    );
    Ok(result.rows_affected())
}

/// Remove `tag_id` from every note's tag list. Returns the number of notes updated.
pub async fn remove_tag_references(
    tx: &mut Transaction<'_, Postgres>,
    tag_id: ObjectId,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE note SET tag_ids = array_remove(tag_ids, $1) WHERE $1 = ANY(tag_ids)",
    )
    .bind(tag_id.to_hex())
    .execute(&mut **tx)
    .await
    .map_err(Error::Database)?;

    debug!(
        subsystem = "db",
        component = "integrity",
        op = "remove_tag",
        tag_id = %tag_id,
        notes_updated = result.rows_affected(),
        "Removed tag references"
    );
    Ok(result.rows_affected())
}
