//! # noteful-db
//!
//! Storage layer for noteful.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL repositories for notes, folders, and tags
//! - Transactional reference cleanup when folders and tags are deleted
//! - An in-memory backend implementing the same traits
//!
//! ## Example
//!
//! ```rust,ignore
//! use noteful_db::{Database, NoteInput, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/noteful").await?;
//!
//!     let note = db.notes.insert(NoteInput {
//!         title: "Hello".to_string(),
//!         content: Some("world".to_string()),
//!         ..Default::default()
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod folders;
pub mod integrity;
pub mod memory;
mod named;
pub mod notes;
pub mod pool;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use noteful_core::*;

pub use folders::PgFolderRepository;
pub use memory::{MemoryFolderRepository, MemoryNoteRepository, MemoryStore, MemoryTagRepository};
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig, PoolStats};
pub use tags::PgTagRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Parse an identifier read back from a TEXT column.
///
/// The schema constrains these columns to 24 hex characters, so a failure
/// here means the row was written outside this crate.
pub(crate) fn parse_stored_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw)
        .map_err(|e| Error::Internal(format!("corrupt stored id {:?}: {}", raw, e)))
}

/// Combined database access with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository.
    pub notes: PgNoteRepository,
    /// Folder repository. Deletes clear note references.
    pub folders: PgFolderRepository,
    /// Tag repository. Deletes remove tag membership from notes.
    pub tags: PgTagRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            folders: PgFolderRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to database with default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close every pooled connection. Waits for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
