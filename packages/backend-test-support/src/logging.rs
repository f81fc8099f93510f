//! Test logging bootstrap shared by the backend's integration test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test-friendly subscriber once per process.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `"warn"`. Set
/// `TEST_LOG_JSON=1` to get the same JSON layout the service emits in
/// production, which is handy when checking structured fields such as
/// `session_id` or `order_number`.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let json = std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1");

        if json {
            fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .without_time()
                .json()
                .try_init()
                .ok();
        } else {
            fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .without_time()
                .try_init()
                .ok();
        }
    });
}
