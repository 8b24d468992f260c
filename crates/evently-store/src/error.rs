//! Storage errors.

use thiserror::Error;

/// Errors surfaced by repository operations.
///
/// These carry no HTTP semantics; the API layer decides what each one means
/// to a caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-email constraint violation on user insert.
    #[error("email already registered")]
    DuplicateEmail,

    /// Backend failure. The in-memory store never produces this; it exists
    /// for backends that can.
    #[error("storage backend error: {0}")]
    Backend(String),
}
