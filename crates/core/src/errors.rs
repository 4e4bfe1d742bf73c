//! Core error types for Recipe Saver.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// The variants line up with the four failure classes callers care about:
/// transport (`Database`, `BlobStorage`), auth (`Unauthorized`), validation
/// (`Validation`) and not-found (`Database(DatabaseError::NotFound)`).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Blob storage failed: {0}")]
    BlobStorage(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Shorthand for a missing (or foreign-owned) record.
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::Database(DatabaseError::NotFound(what.into()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::NotFound(_)))
    }

    /// True for failures of the backing service itself rather than of the request.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Database(e) => !matches!(
                e,
                DatabaseError::NotFound(_)
                    | DatabaseError::UniqueViolation(_)
                    | DatabaseError::ForeignKeyViolation(_)
            ),
            Error::BlobStorage(_) => true,
            _ => false,
        }
    }
}

/// Storage failures, with driver details flattened to strings by the storage crate.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// No pooled connection could be checked out.
    #[error("Database pool error: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Missing, or owned by another user.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Taken email at sign-up.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Writer actor gone, undecodable column, and similar.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::BlobStorage(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
