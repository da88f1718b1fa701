//! The [`TestDatabase`] fixture.
//!
//! A `TestDatabase` owns exactly one `SQLite` connection and, when it was
//! opened on a real path, the file behind it. Closing the fixture (explicitly
//! or by dropping it) closes the connection and deletes that file, so a test
//! leaves nothing behind even when it panics.
//!
//! ```rust
//! # fn main() -> testdb::Result<()> {
//! let db = testdb::TestDatabase::in_memory()?;
//! db.connection()?
//!     .execute_batch(r#"CREATE TABLE "check" (id INTEGER PRIMARY KEY, value TEXT)"#)?;
//! assert_eq!(db.tables(), ["check"]);
//! # Ok(())
//! # }
//! ```

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Params};
use tracing::{debug, info, warn};

use crate::catalog::{self, SchemaKind};
use crate::config::{MEMORY_PATH, TestDbConfig};
use crate::errors::{Result, TestDbError};
use crate::query;
use crate::row::Row;
use crate::target;

/// An ephemeral `SQLite` database for a single test.
///
/// Catalog accessors ([`tables`](Self::tables), [`has_table`](Self::has_table),
/// [`table_schema`](Self::table_schema), ...) never fail: a query error is
/// logged and reported as the empty answer. Query helpers
/// ([`select`](Self::select) and friends) return every error to the caller.
#[derive(Debug)]
pub struct TestDatabase {
    config: TestDbConfig,
    uri: String,
    conn: Option<Connection>,
}

impl TestDatabase {
    /// Open a fresh in-memory database.
    ///
    /// `TESTDB_*` environment overrides apply, see [`TestDbConfig::from_env`].
    pub fn in_memory() -> Result<Self> {
        Self::with_config(TestDbConfig::from_env(MEMORY_PATH))
    }

    /// Open a database at `path`. An empty path or `:memory:` selects a
    /// fresh in-memory database; `file:` URIs are accepted as-is.
    ///
    /// A file created here is deleted when the database is closed unless
    /// `TESTDB_KEEP_FILE` is set. Other `TESTDB_*` overrides apply too.
    pub fn with_path(path: impl Into<String>) -> Result<Self> {
        Self::with_config(TestDbConfig::from_env(path))
    }

    /// Open a database with explicit settings. The environment is not read.
    pub fn with_config(config: TestDbConfig) -> Result<Self> {
        let mut db = Self {
            config,
            uri: String::new(),
            conn: None,
        };
        db.open()?;
        Ok(db)
    }

    /// Open a new connection using the configured path.
    ///
    /// A connection that is already open is closed first, exactly as
    /// [`close`](Self::close) would, deleting its file. For a file-backed
    /// database this starts over from an empty file.
    pub fn open(&mut self) -> Result<()> {
        self.close();

        let uri = target::connection_uri(&self.config);
        let flags = OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(&uri, flags).map_err(|source| TestDbError::Open {
            target: uri.clone(),
            source,
        })?;

        conn.execute_batch(&self.config.pragmas())
            .map_err(|e| TestDbError::Config(format!("pragmas: {e}")))?;

        info!(uri = %uri, "test database opened");
        self.uri = uri;
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the connection and delete the backing file, if any.
    ///
    /// A no-op when nothing is open. Failures are logged and otherwise
    /// ignored. The file is kept when the database is in-memory or
    /// [`TestDbConfig::keep_file`] is set.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        let file = catalog::main_file(&conn).unwrap_or_else(|e| {
            warn!(uri = %self.uri, error = %e, "could not resolve test database file");
            String::new()
        });

        if let Err((_, e)) = conn.close() {
            warn!(uri = %self.uri, error = %e, "closing test database failed");
        }

        if file.is_empty() || file == MEMORY_PATH {
            debug!(uri = %self.uri, "in-memory test database closed");
            return;
        }
        if self.config.keep_file {
            info!(file = %file, "test database closed, file kept");
            return;
        }

        match std::fs::remove_file(&file) {
            Ok(()) => info!(file = %file, "test database closed and removed"),
            Err(e) => warn!(file = %file, error = %e, "removing test database file failed"),
        }
    }

    /// Whether a connection is currently held.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// The configured path (`:memory:` for in-memory databases).
    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// `SQLite` URI of the current (or most recent) connection.
    ///
    /// With shared cache enabled, opening this URI gives a second connection
    /// to the same database, in-memory ones included.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The settings this database was opened with.
    pub fn config(&self) -> &TestDbConfig {
        &self.config
    }

    /// The raw connection, for DDL/DML and anything the helpers do not cover.
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(TestDbError::Closed)
    }

    /// File backing the `main` database as reported by the engine.
    ///
    /// Empty for in-memory databases and once closed.
    pub fn resolved_file_path(&self) -> String {
        self.connection()
            .and_then(catalog::main_file)
            .unwrap_or_else(|e| {
                debug!(error = %e, "resolving test database file failed");
                String::new()
            })
    }

    // ── Catalog ─────────────────────────────────────────────────────────

    /// Sorted names of non-reserved objects of `kind`.
    pub fn objects(&self, kind: SchemaKind) -> Vec<String> {
        self.connection()
            .and_then(|conn| catalog::object_names(conn, kind))
            .unwrap_or_else(|e| {
                warn!(kind = %kind, error = %e, "listing schema objects failed");
                Vec::new()
            })
    }

    /// Whether an object of `kind` named exactly `name` exists.
    pub fn has_object(&self, kind: SchemaKind, name: &str) -> bool {
        self.connection()
            .and_then(|conn| catalog::object_exists(conn, kind, name))
            .unwrap_or_else(|e| {
                warn!(kind = %kind, name, error = %e, "schema lookup failed");
                false
            })
    }

    /// Stored `CREATE` text of the named object; empty when absent or when
    /// the object has no stored SQL.
    pub fn object_schema(&self, kind: SchemaKind, name: &str) -> String {
        self.connection()
            .and_then(|conn| catalog::object_sql(conn, kind, name))
            .unwrap_or_else(|e| {
                warn!(kind = %kind, name, error = %e, "schema lookup failed");
                None
            })
            .unwrap_or_default()
    }

    /// Sorted table names.
    pub fn tables(&self) -> Vec<String> {
        self.objects(SchemaKind::Table)
    }

    /// Whether the table exists.
    pub fn has_table(&self, name: &str) -> bool {
        self.has_object(SchemaKind::Table, name)
    }

    /// `CREATE TABLE` text of the table, or empty.
    pub fn table_schema(&self, name: &str) -> String {
        self.object_schema(SchemaKind::Table, name)
    }

    /// Sorted index names, excluding implicit `sqlite_autoindex_*` entries.
    pub fn indexes(&self) -> Vec<String> {
        self.objects(SchemaKind::Index)
    }

    /// Whether the index exists.
    pub fn has_index(&self, name: &str) -> bool {
        self.has_object(SchemaKind::Index, name)
    }

    /// `CREATE INDEX` text of the index, or empty.
    pub fn index_schema(&self, name: &str) -> String {
        self.object_schema(SchemaKind::Index, name)
    }

    /// Sorted view names.
    pub fn views(&self) -> Vec<String> {
        self.objects(SchemaKind::View)
    }

    /// Sorted trigger names.
    pub fn triggers(&self) -> Vec<String> {
        self.objects(SchemaKind::Trigger)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Run `query` and collect every row. See [`query::select`].
    pub fn select<P: Params>(&self, query: &str, params: P) -> Result<Vec<Row>> {
        query::select(self.connection()?, query, params)
    }

    /// The named column of the first row. See [`query::select_one`].
    pub fn select_one<P: Params>(
        &self,
        column: &str,
        query: &str,
        params: P,
    ) -> Result<Option<Value>> {
        query::select_one(self.connection()?, column, query, params)
    }

    /// The named column of every row. See [`query::select_list`].
    pub fn select_list<P: Params>(
        &self,
        column: &str,
        query: &str,
        params: P,
    ) -> Result<Vec<Value>> {
        query::select_list(self.connection()?, column, query, params)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        self.close();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
