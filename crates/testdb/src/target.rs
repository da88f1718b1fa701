//! Connection target resolution.
//!
//! Every database is opened through an `SQLite` URI so the shared-cache
//! directive can be attached uniformly:
//!
//! - `""` / `:memory:` become a uniquely named in-memory database
//!   (`file:testdb-<uuid>?mode=memory&cache=shared`). The unique name keeps
//!   parallel tests in one process from sharing a cache.
//! - `file:` URIs are passed through with the directive appended.
//! - Anything else is a filesystem path, escaped into a `file:` URI. Absolute
//!   paths get an empty authority (`file:///tmp/x.db`) so a path starting
//!   with `//` is never read as a host.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use uuid::Uuid;

use crate::config::TestDbConfig;

/// Characters with URI meaning that may legitimately appear in a path.
const PATH_ESCAPES: &AsciiSet = &CONTROLS.add(b'%').add(b'?').add(b'#');

const SHARED_CACHE: &str = "cache=shared";

/// Build the URI handed to the engine for `config`.
pub(crate) fn connection_uri(config: &TestDbConfig) -> String {
    let mut uri = if config.is_memory() {
        format!("file:testdb-{}?mode=memory", Uuid::now_v7().simple())
    } else if config.path.starts_with("file:") {
        config.path.clone()
    } else if config.path.starts_with('/') {
        format!("file://{}", utf8_percent_encode(&config.path, PATH_ESCAPES))
    } else {
        format!("file:{}", utf8_percent_encode(&config.path, PATH_ESCAPES))
    };

    if config.shared_cache {
        uri.push(if uri.contains('?') { '&' } else { '?' });
        uri.push_str(SHARED_CACHE);
    }
    uri
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
