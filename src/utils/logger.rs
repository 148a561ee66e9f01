use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when `RUST_LOG` is unset: this crate at info, dependencies at warn.
pub const DEFAULT_FILTER: &str = concat!("warn,", env!("CARGO_CRATE_NAME"), "=info");

fn cli_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Logs go to stderr so stdout only carries the conversion summary.
pub fn init_cli_logger() {
    tracing_subscriber::registry()
        .with(cli_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
