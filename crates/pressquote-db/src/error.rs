//! # Database Error Types
//!
//! Error types for catalog database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller decides: retry, surface, or fail the quote                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing errors from the core engine pass through untouched via the
//! `Quote` variant so the `Quoter` facade has a single error type.

use thiserror::Error;

use pressquote_core::QuoteError;

/// Catalog database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in the catalog.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A catalog row exists but its payload cannot be used: bad rule JSON,
    /// out-of-range numbers, broken references.
    ///
    /// ## When This Occurs
    /// - Binding rule blob fails to parse against the closed rule schema
    /// - A tier row references a missing parent
    #[error("corrupt catalog row in {entity} '{id}': {message}")]
    CorruptCatalog {
        entity: &'static str,
        id: String,
        message: String,
    },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Pricing error from the core engine, passed through by the facade.
    #[error(transparent)]
    Quote(#[from] QuoteError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a CorruptCatalog error.
    pub fn corrupt(entity: &'static str, id: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::CorruptCatalog {
            entity,
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::Database       → DbError::QueryFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
