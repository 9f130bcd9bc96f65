use tracing_subscriber::EnvFilter;

/// Routes the crate's `tracing` events to the test output.
///
/// Verbosity comes from `RUST_LOG`, e.g. `RUST_LOG=cqlx_mock=trace`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
