use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness capture
///
/// Filter comes from `RUST_LOG`, `info` when unset. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn setup_log() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}
