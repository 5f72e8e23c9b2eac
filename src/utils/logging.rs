use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the global logger.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` applies. Only the
/// first call installs a logger, later calls return false.
pub fn init_logging(default_level: &str) -> bool {
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

/// Logger for tests: captured by the test harness, never fails
pub fn init_test_logging() {
    let _ = Builder::new()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
