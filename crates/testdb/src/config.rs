//! Test database configuration.
//!
//! A [`TestDbConfig`] starts from [`Default`] (a shared-cache in-memory
//! database), can be deserialized from a fixture file, and can be adjusted
//! from the environment with [`TestDbConfig::apply_env_overrides`].
//!
//! Recognized environment variables:
//!
//! | Variable                 | Field             | Accepted values            |
//! |--------------------------|-------------------|----------------------------|
//! | `TESTDB_BUSY_TIMEOUT_MS` | `busy_timeout_ms` | integer in `1..=600000`    |
//! | `TESTDB_FOREIGN_KEYS`    | `foreign_keys`    | `true/1/yes/on`, `false/0/no/off` |
//! | `TESTDB_KEEP_FILE`       | `keep_file`       | same as above              |
//!
//! Invalid values are ignored and the current value is kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Path value that selects a transient in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Settings used when opening a [`TestDatabase`](crate::TestDatabase).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestDbConfig {
    /// Database path, `file:` URI, or [`MEMORY_PATH`]. Empty means in-memory.
    pub path: String,
    /// Append the `cache=shared` directive to the connection URI.
    pub shared_cache: bool,
    /// `PRAGMA busy_timeout` in milliseconds.
    pub busy_timeout_ms: u32,
    /// `PRAGMA foreign_keys`.
    pub foreign_keys: bool,
    /// Leave the backing file on disk when the database is closed.
    pub keep_file: bool,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            path: MEMORY_PATH.to_string(),
            shared_cache: true,
            busy_timeout_ms: 5000,
            foreign_keys: false,
            keep_file: false,
        }
    }
}

impl TestDbConfig {
    /// Default settings for the given path. An empty path means in-memory.
    pub fn with_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() {
                MEMORY_PATH.to_string()
            } else {
                path
            },
            ..Self::default()
        }
    }

    /// Settings for `path` with `TESTDB_*` environment overrides applied.
    pub fn from_env(path: impl Into<String>) -> Self {
        let mut config = Self::with_path(path);
        config.apply_env_overrides();
        config
    }

    /// Whether the configured path selects the transient in-memory database.
    pub fn is_memory(&self) -> bool {
        self.path.is_empty() || self.path == MEMORY_PATH
    }

    /// Apply `TESTDB_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TESTDB_BUSY_TIMEOUT_MS").and_then(|raw| parse_u32(&raw, 1, 600_000)) {
            debug!(busy_timeout_ms = v, "busy timeout overridden from environment");
            self.busy_timeout_ms = v;
        }
        if let Some(v) = lookup("TESTDB_FOREIGN_KEYS").and_then(|raw| parse_bool(&raw)) {
            debug!(foreign_keys = v, "foreign keys overridden from environment");
            self.foreign_keys = v;
        }
        if let Some(v) = lookup("TESTDB_KEEP_FILE").and_then(|raw| parse_bool(&raw)) {
            debug!(keep_file = v, "keep_file overridden from environment");
            self.keep_file = v;
        }
    }

    /// Pragmas executed on every freshly opened connection.
    pub(crate) fn pragmas(&self) -> String {
        format!(
            "PRAGMA busy_timeout = {};\
             PRAGMA foreign_keys = {};",
            self.busy_timeout_ms,
            if self.foreign_keys { "ON" } else { "OFF" }
        )
    }
}

fn parse_u32(raw: &str, min: u32, max: u32) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
