//! Store error definitions.

use thiserror::Error;

use crate::store::contact::{ContactId, ContactValidationError};

/// Errors returned by contact store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No contact exists with the given id.
    #[error("contact {0} not found")]
    NotFound(ContactId),

    /// Supplied fields failed validation before reaching the database.
    #[error(transparent)]
    Validation(#[from] ContactValidationError),

    /// The database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store is unusable, e.g. its lock was poisoned by a panic.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
