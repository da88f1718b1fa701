//! # testdb
//!
//! Ephemeral `SQLite` databases for other projects' test suites.
//!
//! - **[`TestDatabase`]**: in-memory or file-backed fixture that owns one
//!   connection and deletes its file on close or drop
//! - **Catalog**: table/index/view/trigger names and their `CREATE` text from
//!   `sqlite_schema`, with engine-reserved `sqlite_*` objects filtered out
//! - **Queries**: run any parameterized statement and get rows back as
//!   ordered column-name to [`Value`] mappings
//! - **Config**: [`TestDbConfig`] with `TESTDB_*` environment overrides
//! - **Logging**: [`init_test_tracing`] for readable `tracing` output in tests

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod query;
pub mod row;
mod target;

pub use catalog::SchemaKind;
pub use config::{MEMORY_PATH, TestDbConfig};
pub use database::TestDatabase;
pub use errors::{Result, TestDbError};
pub use logging::init_test_tracing;
pub use row::Row;
pub use rusqlite;
pub use rusqlite::types::Value;
