//! Shared helpers for the `webapp-rebuild` integration tests.

pub mod builders;
pub mod fake_backend;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness capture.
///
/// Defaults to `webapp_rebuild=debug`; `RUST_LOG` overrides it. Output only
/// shows for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("webapp_rebuild=debug,warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
