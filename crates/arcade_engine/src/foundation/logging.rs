//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system at `default_level`
///
/// `RUST_LOG` still overrides the default. Safe to call more than once;
/// later calls are ignored so tests and binaries can both initialize without
/// coordinating.
pub fn init(default_level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
