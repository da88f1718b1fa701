//! Tracing setup for test suites that use this crate.

use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness so it only shows up for
/// failing tests.
///
/// `level` is a filter directive such as `"debug"` or `"testdb=trace"`;
/// `RUST_LOG` replaces it when set. Only the first call in a process
/// installs anything.
pub fn init_test_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level, "test tracing installed");
    }
}
