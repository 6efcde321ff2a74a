//! `/api/notes` handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use noteful_core::{
    optional_valid_id, require_field, require_valid_id, require_valid_ids, Note, NoteFilter,
    NoteInput, PopulatedNote, Result,
};

use super::created;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    pub search_term: Option<String>,
    pub folder_id: Option<String>,
    pub tag_id: Option<String>,
}

impl ListNotesQuery {
    fn into_filter(self) -> Result<NoteFilter> {
        Ok(NoteFilter {
            folder_id: optional_valid_id(self.folder_id.as_deref(), "folderId")?,
            tag_id: optional_valid_id(self.tag_id.as_deref(), "tagId")?,
            search_term: self.search_term,
        })
    }
}

/// Create and update body. Every field is optional at the wire level so
/// that missing values surface as validation messages.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NoteBody {
    fn into_input(self) -> Result<NoteInput> {
        let title = require_field(self.title.as_deref(), "title")?.to_string();
        let folder_id = optional_valid_id(self.folder_id.as_deref(), "folderId")?;
        let tags = require_valid_ids(self.tags.as_deref().unwrap_or_default(), "tags")?;
        Ok(NoteInput {
            title,
            content: self.content,
            folder_id,
            tags,
        })
    }
}

pub async fn list_notes(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListNotesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PopulatedNote>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let notes = state.notes.list(filter).await?;
    debug!(
        subsystem = "api",
        component = "notes",
        op = "list",
        result_count = notes.len(),
        "Listed notes"
    );
    Ok(Json(notes))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PopulatedNote>> {
    let id = require_valid_id(&id, "id")?;
    state
        .notes
        .fetch(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_note(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: std::result::Result<Json<NoteBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let input = body.into_input()?;

    let note = state.notes.insert(input).await?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        note_id = %note.id,
        "Note created"
    );
    Ok(created(&uri, note.id, note))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<NoteBody>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let id = require_valid_id(&id, "id")?;
    let Json(body) = payload?;
    let input = body.into_input()?;

    let note = state.notes.replace(id, input).await?.ok_or(ApiError::NotFound)?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "replace",
        note_id = %id,
        "Note updated"
    );
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = require_valid_id(&id, "id")?;
    let existed = state.notes.delete(id).await?;
    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        note_id = %id,
        existed,
        "Note deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
