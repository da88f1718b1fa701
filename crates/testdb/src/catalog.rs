//! Schema catalog introspection.
//!
//! Reads `sqlite_schema` and `pragma_database_list` through the generic
//! helpers in [`crate::query`]. Objects whose names start with the engine's
//! reserved `sqlite_` prefix (autoindexes, `sqlite_sequence`, ...) are never
//! listed.

use std::fmt;

use rusqlite::Connection;
use rusqlite::types::Value;

use crate::errors::Result;
use crate::query::{select_list, select_one};

const SELECT_SCHEMA_SQL: &str = "SELECT sql FROM sqlite_schema WHERE type = ?1 AND name = ?2";

const SELECT_SCHEMA_NAME: &str =
    "SELECT name FROM sqlite_schema WHERE type = ?1 AND name = ?2 ORDER BY name";

const SELECT_SCHEMA_NAMES: &str = "SELECT name FROM sqlite_schema \
     WHERE type = ?1 AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
     ORDER BY name";

const SELECT_MAIN_FILE: &str = "SELECT file FROM pragma_database_list WHERE name = 'main'";

/// Kind of object recorded in `sqlite_schema`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// `CREATE TABLE`
    Table,
    /// `CREATE INDEX`, including implicit indexes.
    Index,
    /// `CREATE VIEW`
    View,
    /// `CREATE TRIGGER`
    Trigger,
}

impl SchemaKind {
    /// Value of the `type` column for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Index => "index",
            Self::View => "view",
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of all non-reserved objects of `kind`, sorted.
pub fn object_names(conn: &Connection, kind: SchemaKind) -> Result<Vec<String>> {
    let values = select_list(conn, "name", SELECT_SCHEMA_NAMES, [kind.as_str()])?;
    Ok(values.into_iter().filter_map(into_text).collect())
}

/// Whether an object of `kind` named exactly `name` exists.
pub fn object_exists(conn: &Connection, kind: SchemaKind, name: &str) -> Result<bool> {
    let value = select_one(conn, "name", SELECT_SCHEMA_NAME, [kind.as_str(), name])?;
    Ok(value.is_some())
}

/// Stored `CREATE` text of the named object.
///
/// `None` when the object does not exist or has no stored SQL, as with the
/// implicit indexes behind `UNIQUE` and `PRIMARY KEY` constraints.
pub fn object_sql(conn: &Connection, kind: SchemaKind, name: &str) -> Result<Option<String>> {
    let value = select_one(conn, "sql", SELECT_SCHEMA_SQL, [kind.as_str(), name])?;
    Ok(value.and_then(into_text))
}

/// File backing the `main` database; empty for in-memory databases.
pub fn main_file(conn: &Connection) -> Result<String> {
    let value = select_one(conn, "file", SELECT_MAIN_FILE, [])?;
    Ok(value.and_then(into_text).unwrap_or_default())
}

fn into_text(value: Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn kind_strings() {
        assert_eq!(SchemaKind::Table.as_str(), "table");
        assert_eq!(SchemaKind::Index.to_string(), "index");
        assert_eq!(SchemaKind::View.as_str(), "view");
        assert_eq!(SchemaKind::Trigger.as_str(), "trigger");
    }

    #[test]
    fn empty_catalog() {
        let conn = conn();
        assert!(object_names(&conn, SchemaKind::Table).unwrap().is_empty());
        assert!(!object_exists(&conn, SchemaKind::Table, "nope").unwrap());
        assert_eq!(object_sql(&conn, SchemaKind::Table, "nope").unwrap(), None);
    }

    #[test]
    fn names_sorted_and_reserved_excluded() {
        let conn = conn();
        conn.execute_batch(
            "CREATE TABLE zeta (id INTEGER PRIMARY KEY AUTOINCREMENT);
             CREATE TABLE alpha (code TEXT UNIQUE);
             CREATE TABLE sqlitex (id INTEGER);",
        )
        .unwrap();
        let tables = object_names(&conn, SchemaKind::Table).unwrap();
        // AUTOINCREMENT creates sqlite_sequence; sqlitex lacks the underscore.
        assert_eq!(tables, ["alpha", "sqlitex", "zeta"]);
        // The UNIQUE constraint's sqlite_autoindex_alpha_1 is hidden.
        assert!(object_names(&conn, SchemaKind::Index).unwrap().is_empty());
    }

    #[test]
    fn exists_is_kind_specific() {
        let conn = conn();
        conn.execute_batch("CREATE TABLE t (a TEXT); CREATE INDEX t_a ON t (a);")
            .unwrap();
        assert!(object_exists(&conn, SchemaKind::Table, "t").unwrap());
        assert!(!object_exists(&conn, SchemaKind::Index, "t").unwrap());
        assert!(object_exists(&conn, SchemaKind::Index, "t_a").unwrap());
        assert!(!object_exists(&conn, SchemaKind::Table, "T").unwrap());
    }

    #[test]
    fn sql_returned_verbatim() {
        let conn = conn();
        let create = "CREATE VIEW v AS SELECT 1 AS one";
        conn.execute_batch(create).unwrap();
        assert_eq!(
            object_sql(&conn, SchemaKind::View, "v").unwrap().as_deref(),
            Some(create)
        );
    }

    #[test]
    fn implicit_index_has_no_sql() {
        let conn = conn();
        conn.execute_batch("CREATE TABLE u (code TEXT UNIQUE);").unwrap();
        assert!(object_exists(&conn, SchemaKind::Index, "sqlite_autoindex_u_1").unwrap());
        assert_eq!(
            object_sql(&conn, SchemaKind::Index, "sqlite_autoindex_u_1").unwrap(),
            None
        );
    }

    #[test]
    fn main_file_empty_in_memory() {
        assert_eq!(main_file(&conn()).unwrap(), "");
    }
}
