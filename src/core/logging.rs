//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// dynamic_skies::core::logging::init();
/// log::info!("Skybox driver started");
/// ```
pub fn init() {
    // Hosts may have installed a logger already; keep theirs.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        log::info!("logger initialized twice without panicking");
    }
}
