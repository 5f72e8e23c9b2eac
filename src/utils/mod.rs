pub mod logging;

// Re-export logging setup
pub use logging::{init_logging, init_test_logging};
