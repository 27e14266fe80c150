//! Logger initialization
//!
//! Everything logs through the `log` facade; `env_logger` is the backend.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Filter priority: `filter` argument, then `RUST_LOG`, then `info`.
/// The syntax is `env_logger`'s (e.g. "warn", "softraster=debug").
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        // A second logger may already be installed (e.g. by a test harness)
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
