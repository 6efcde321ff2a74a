//! `/api/tags` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::info;

use noteful_core::{require_field, require_valid_id, Tag};

use super::{created, NameBody};
use crate::{ApiError, ApiResult, AppState};

pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tags.list().await?))
}

pub async fn get_tag(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Tag>> {
    let id = require_valid_id(&id, "id")?;
    state
        .tags
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_tag(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let name = require_field(body.name.as_deref(), "name")?;

    let tag = state.tags.create(name).await?;
    info!(
        subsystem = "api",
        component = "tags",
        op = "create",
        tag_id = %tag.id,
        "Tag created"
    );
    Ok(created(&uri, tag.id, tag))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<Json<Tag>> {
    let id = require_valid_id(&id, "id")?;
    let Json(body) = payload?;
    let name = require_field(body.name.as_deref(), "name")?;

    state
        .tags
        .rename(id, name)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// Removes the tag and strips it from every note. 204 even when nothing matched.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = require_valid_id(&id, "id")?;
    let outcome = state.tags.delete(id).await?;
    tracing::debug!(
        subsystem = "api",
        component = "tags",
        op = "delete",
        tag_id = %id,
        deleted = outcome.deleted,
        notes_updated = outcome.notes_updated,
        "Tag delete handled"
    );
    Ok(StatusCode::NO_CONTENT)
}
