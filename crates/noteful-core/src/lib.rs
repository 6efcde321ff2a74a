//! # noteful-core
//!
//! Core types, traits, and validation for the noteful API.
//!
//! This crate provides the resource models, the identifier scheme, the
//! shared error type, and the repository traits that storage backends in
//! `noteful-db` implement.
//!
//! Structured log field names used across the workspace are listed in
//! [`logging`]; new `tracing` fields should be added there first.

pub mod error;
pub mod logging;
pub mod models;
pub mod object_id;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use object_id::{ObjectId, ParseObjectIdError, OBJECT_ID_HEX_LEN};
pub use traits::*;
pub use validation::{optional_valid_id, require_field, require_valid_id, require_valid_ids};
