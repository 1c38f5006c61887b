use tracing_subscriber::{fmt, EnvFilter};

/// Installs a JSON-formatted `tracing` subscriber, level controlled by
/// `RUST_LOG` (defaults to `info`). Called once per binary before
/// anything else logs.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).json().finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global tracing subscriber already set");
    }
}
