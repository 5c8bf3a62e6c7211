/// Initialize structured logging with tracing.
/// `RUST_LOG` takes precedence over `default_level`. Safe to call more than
/// once; later calls leave the first subscriber in place.
pub fn init_logging(default_level: &str) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .json()
        );

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => tracing::info!(level = default_level, "Structured logging initialized"),
        Err(_) => tracing::debug!("Global subscriber already set, keeping it"),
    }
}
