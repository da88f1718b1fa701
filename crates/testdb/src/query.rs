//! Generic query helpers over a borrowed connection.
//!
//! Stateless functions: each takes `&Connection`, runs one statement, and
//! materializes every result row as a [`Row`]. [`TestDatabase`] delegates
//! here, and they are public for callers that already hold a connection.
//!
//! [`TestDatabase`]: crate::TestDatabase

use rusqlite::types::Value;
use rusqlite::{Connection, Params};
use tracing::debug;

use crate::errors::{Result, TestDbError};
use crate::row::Row;

/// Run `query` with `params` and collect every result row in engine order.
///
/// Prepare, bind and step failures are returned as [`TestDbError::Query`].
/// A column that cannot be read is recorded as [`Value::Null`].
pub fn select<P: Params>(conn: &Connection, query: &str, params: P) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(query)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();

    let mut rows = stmt.query(params)?;
    let mut results = Vec::new();
    while let Some(raw) = rows.next()? {
        let mut row = Row::new();
        for (idx, name) in names.iter().enumerate() {
            let value = raw.get_ref(idx).map_or(Value::Null, Value::from);
            row.insert(name.as_str(), value);
        }
        results.push(row);
    }

    debug!(sql = query, rows = results.len(), "select complete");
    Ok(results)
}

/// The named column of the first result row.
///
/// Returns `Ok(None)` when the query yields no rows and
/// [`TestDbError::ColumnNotFound`] when the first row lacks `column`.
pub fn select_one<P: Params>(
    conn: &Connection,
    column: &str,
    query: &str,
    params: P,
) -> Result<Option<Value>> {
    let Some(mut first) = select(conn, query, params)?.into_iter().next() else {
        return Ok(None);
    };
    first
        .take(column)
        .map(Some)
        .ok_or_else(|| TestDbError::ColumnNotFound(column.to_string()))
}

/// The named column of every result row, in row order.
///
/// Fails with [`TestDbError::ColumnNotFound`] as soon as a row lacks
/// `column`; no partial list is returned.
pub fn select_list<P: Params>(
    conn: &Connection,
    column: &str,
    query: &str,
    params: P,
) -> Result<Vec<Value>> {
    select(conn, query, params)?
        .into_iter()
        .map(|mut row| {
            row.take(column)
                .ok_or_else(|| TestDbError::ColumnNotFound(column.to_string()))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
