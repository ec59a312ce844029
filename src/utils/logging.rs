use env_logger::Env;

/// Install env_logger. `RUST_LOG` wins over `default_level`; calling twice is harmless.
pub fn init_logging(default_level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
