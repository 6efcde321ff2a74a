//! `/api/folders` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use tracing::info;

use noteful_core::{require_field, require_valid_id, Folder};

use super::{created, NameBody};
use crate::{ApiError, ApiResult, AppState};

pub async fn list_folders(State(state): State<AppState>) -> ApiResult<Json<Vec<Folder>>> {
    Ok(Json(state.folders.list().await?))
}

pub async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Folder>> {
    let id = require_valid_id(&id, "id")?;
    state
        .folders
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_folder(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = payload?;
    let name = require_field(body.name.as_deref(), "name")?;

    let folder = state.folders.create(name).await?;
    info!(
        subsystem = "api",
        component = "folders",
        op = "create",
        folder_id = %folder.id,
        "Folder created"
    );
    Ok(created(&uri, folder.id, folder))
}

pub async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NameBody>, JsonRejection>,
) -> ApiResult<Json<Folder>> {
    let id = require_valid_id(&id, "id")?;
    let Json(body) = payload?;
    let name = require_field(body.name.as_deref(), "name")?;

    let folder = state
        .folders
        .rename(id, name)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(folder))
}

/// Removes the folder and unfiles its notes. 204 even when nothing matched.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = require_valid_id(&id, "id")?;
    state.folders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
