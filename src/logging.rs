use tracing_subscriber::{fmt, EnvFilter};

/// Console logging. `RUST_LOG` wins over the built-in default filter.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,catalogprep=debug"
    } else {
        "info,catalogprep=info"
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
}

/// Route test logs through the test harness; safe to call repeatedly.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,catalogprep=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
