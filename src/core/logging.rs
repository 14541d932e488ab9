//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g. `RUST_LOG=tinsel=trace`
/// to see per-frame resource skips.
///
/// # Example
/// ```no_run
/// tinsel::core::logging::init();
/// log::info!("Scene started");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}
