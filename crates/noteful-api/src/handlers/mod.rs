//! HTTP handlers for notes, folders, tags, and health.

pub mod folders;
pub mod health;
pub mod notes;
pub mod tags;

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use noteful_core::ObjectId;

/// Body for folder and tag create/update.
#[derive(Debug, Default, Deserialize)]
pub struct NameBody {
    pub name: Option<String>,
}

/// 201 with `Location: <request path>/<id>`.
pub(crate) fn created<T: Serialize>(uri: &Uri, id: ObjectId, body: T) -> Response {
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), id);
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_sets_location() {
        let id = ObjectId::new();
        let uri: Uri = "/api/folders".parse().unwrap();
        let response = created(&uri, id, serde_json::json!({}));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::LOCATION],
            format!("/api/folders/{}", id).as_str()
        );
    }
}
