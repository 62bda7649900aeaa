//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from the `RUST_LOG` environment variable
///
/// Calling this more than once is harmless, later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize the logging system with an explicit filter such as `"info"` or
/// `"vis_editor=debug,vis_runtime=info"`
pub fn init_with_level(filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new().parse_filters(filter).try_init()
}
