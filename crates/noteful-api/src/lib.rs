//! # noteful-api
//!
//! HTTP API for notes, folders, and tags.
//!
//! The router is storage-agnostic: handlers talk to the repository traits
//! through [`AppState`], which is built either from a Postgres
//! [`Database`] or from an in-memory [`MemoryStore`].

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderName, Method, Request};
use axum::routing::get;
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use noteful_core::{FolderRepository, NoteRepository, TagRepository};
use noteful_db::{Database, MemoryStore};

pub use config::{ServerConfig, StorageBackend};
pub use error::ApiError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

const X_REQUEST_ID: &str = "x-request-id";

/// Repositories shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub folders: Arc<dyn FolderRepository>,
    pub tags: Arc<dyn TagRepository>,
}

impl AppState {
    pub fn from_database(db: &Database) -> Self {
        Self {
            notes: Arc::new(db.notes.clone()),
            folders: Arc::new(db.folders.clone()),
            tags: Arc::new(db.tags.clone()),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            notes: Arc::new(store.notes),
            folders: Arc::new(store.folders),
            tags: Arc::new(store.tags),
        }
    }
}

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with middleware.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    use handlers::{folders, health, notes, tags};

    let api = Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/folders", get(folders::list_folders).post(folders::create_folder))
        .route(
            "/folders/:id",
            get(folders::get_folder)
                .put(folders::update_folder)
                .delete(folders::delete_folder),
        )
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/tags/:id",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        );

    Router::new()
        .nest("/api", api)
        .route("/health", get(health::health_check))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let request_id = req
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .expose_headers([header::LOCATION, HeaderName::from_static(X_REQUEST_ID)])
                .max_age(Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(config.request_body_limit))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
