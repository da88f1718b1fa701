//! Error types for test database operations.
//!
//! [`TestDbError`] separates the failure modes a test usually wants to
//! assert on: the database could not be opened, a query failed, or a query
//! succeeded but did not produce the requested column.

use thiserror::Error;

/// Errors that can occur while opening or querying a [`TestDatabase`].
///
/// [`TestDatabase`]: crate::TestDatabase
#[derive(Debug, Error)]
pub enum TestDbError {
    /// The engine could not open the connection target.
    #[error("failed to open test database {target}: {source}")]
    Open {
        /// The `SQLite` URI that was handed to the engine.
        target: String,
        /// Underlying engine error.
        #[source]
        source: rusqlite::Error,
    },

    /// Preparing, binding or stepping a query failed.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The query ran but a result row has no column with this name.
    #[error("result column not found: {0:?}")]
    ColumnNotFound(String),

    /// The connection was already closed.
    #[error("test database is closed")]
    Closed,

    /// Configuration could not be applied to a fresh connection.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TestDbError {
    /// Whether this error reports a missing result column.
    pub fn is_column_not_found(&self) -> bool {
        matches!(self, Self::ColumnNotFound(_))
    }
}

/// Convenience type alias for test database results.
pub type Result<T> = std::result::Result<T, TestDbError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
