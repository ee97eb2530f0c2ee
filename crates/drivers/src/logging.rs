use env_logger::Env;

/// `RUST_LOG` wins; otherwise the library crates log at `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
}
