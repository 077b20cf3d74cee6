//! Custom error types for the common library
//!
//! This module defines the storage error type shared by every repository in
//! the marketplace services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Database conflict: {0}")]
    Conflict(String),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a query failure, separating unique violations from the rest
    pub fn from_query(err: SqlxError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return DatabaseError::Conflict(db_err.message().to_string());
            }
        }
        DatabaseError::Query(err)
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        DatabaseError::from_query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_a_query_error() {
        let err = DatabaseError::from(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(SqlxError::RowNotFound)));
    }

    #[test]
    fn conflict_message_is_readable() {
        let err = DatabaseError::Conflict("duplicate key".to_string());
        assert_eq!(err.to_string(), "Database conflict: duplicate key");
    }
}
