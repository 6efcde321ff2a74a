//! Error types for noteful.

use thiserror::Error;

/// Result type alias using noteful's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for noteful operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request failed a presence or identifier-format check
    #[error("{0}")]
    Validation(String),

    /// Unique name already taken
    #[error("{0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Missing required field, e.g. "Missing `title` in request body".
    pub fn missing_field(field: &str) -> Self {
        Error::Validation(format!("Missing `{}` in request body", field))
    }

    /// Malformed identifier, e.g. "The `id` is not valid".
    pub fn invalid_id(field: &str) -> Self {
        Error::Validation(format!("The `{}` is not valid", field))
    }

    /// Duplicate name for the given resource kind, e.g. "Folder name already exists".
    pub fn duplicate_name(resource: &str) -> Self {
        Error::Conflict(format!("{} name already exists", resource))
    }

    /// True when Postgres rejected a write on the named unique constraint
    /// (SQLSTATE 23505). Violations of any other constraint return false.
    pub fn is_unique_violation_on(&self, constraint: &str) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
                    && db_err.constraint() == Some(constraint)
            }
            _ => false,
        }
    }
}
