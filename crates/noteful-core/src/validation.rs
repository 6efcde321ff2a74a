//! Request validation.
//!
//! Pure presence and identifier-format checks, run before any persistence
//! call. Every failure is an [`Error::Validation`] whose message names the
//! offending field.

use crate::error::{Error, Result};
use crate::object_id::ObjectId;

/// Require a non-blank value for `field`.
pub fn require_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::missing_field(field)),
    }
}

/// Require `value` to be a well-formed identifier.
pub fn require_valid_id(value: &str, field: &str) -> Result<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| Error::invalid_id(field))
}

/// Validate an optional identifier. Absent and empty values are both `None`.
pub fn optional_valid_id(value: Option<&str>, field: &str) -> Result<Option<ObjectId>> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => require_valid_id(v, field).map(Some),
    }
}

/// Validate every identifier in a list, stopping at the first malformed one.
pub fn require_valid_ids<S: AsRef<str>>(values: &[S], field: &str) -> Result<Vec<ObjectId>> {
    values
        .iter()
        .map(|v| require_valid_id(v.as_ref(), field))
        .collect()
}
