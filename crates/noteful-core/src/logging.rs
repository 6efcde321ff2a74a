//! Structured logging field name constants for noteful.
//!
//! `tracing` macros take field names as literal identifiers, so call sites
//! write `subsystem = "db"` rather than referencing these constants. The
//! constants are the registry of those names: every one of them is emitted
//! by the api or db crate, and the tests below fail if a name stops being
//! used or drifts from its call sites.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed with a 500, or startup failure |
//! | WARN  | Recoverable issue, fallback applied (e.g. bad config value) |
//! | INFO  | Lifecycle events (startup, shutdown), resource creation/deletion |
//! | DEBUG | Cascade counts, query filters, pool metrics |
//! | TRACE | Per-row detail |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "notes", "folders", "tags", "pool", "integrity"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "create", "replace", "delete"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

pub const NOTE_ID: &str = "note_id";

pub const FOLDER_ID: &str = "folder_id";

pub const TAG_ID: &str = "tag_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a list query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of notes touched by a cascade.
pub const NOTES_UPDATED: &str = "notes_updated";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;

    const EMITTERS: &[&str] = &[
        include_str!("../../noteful-api/src/lib.rs"),
        include_str!("../../noteful-api/src/error.rs"),
        include_str!("../../noteful-api/src/handlers/notes.rs"),
        include_str!("../../noteful-api/src/handlers/tags.rs"),
        include_str!("../../noteful-db/src/pool.rs"),
        include_str!("../../noteful-db/src/integrity.rs"),
    ];

    fn emitted(field: &str) -> bool {
        let key = format!("{} = ", field);
        EMITTERS.iter().flat_map(|src| src.lines()).any(|line| {
            let line = line.trim_start();
            line.starts_with(&key)
                || line.contains(&format!("({}", key))
                || line.contains(&format!(", {}", key))
        })
    }

    #[test]
    fn test_every_field_name_is_emitted() {
        for field in [
            REQUEST_ID,
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            NOTE_ID,
            FOLDER_ID,
            TAG_ID,
            DURATION_MS,
            RESULT_COUNT,
            NOTES_UPDATED,
            POOL_SIZE,
            POOL_IDLE,
            ERROR_MSG,
        ] {
            assert!(emitted(field), "no log event carries `{}`", field);
        }
    }

    #[test]
    fn test_unknown_field_is_not_emitted() {
        assert!(!emitted("collection_id"));
    }
}
