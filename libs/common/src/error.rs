//! Storage error taxonomy shared by every store in the workspace

use sqlx::{Error as SqlxError, migrate::MigrateError};
use thiserror::Error;

/// Failure talking to PostgreSQL
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Pool could not connect
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Statement failed
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Embedded migrations could not be applied
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Connection settings are unusable
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
