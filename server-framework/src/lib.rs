//! Shared harness every BOOMS binary starts from: a YAML config file
//! loaded via `RunnableConfig`, a health-check/metrics server on a
//! second port, structured logging, and a panic handler that logs a
//! backtrace instead of silently aborting.

mod config;
mod logging;
mod panic_handler;

pub use config::{GenericConfig, RunnableConfig, ServerArgs};
pub use logging::setup_logging;
pub use panic_handler::setup_panic_handler;

use anyhow::Result;
use std::path::PathBuf;

/// Loads a `GenericConfig<T>` from the YAML file at `path`, installs
/// logging and the panic handler, then runs `config.server_config`
/// while the health-check/metrics server listens on
/// `config.health_check_port`.
pub async fn run_server_with_config<T>(path: PathBuf) -> Result<()>
where
    T: RunnableConfig,
{
    setup_logging();
    setup_panic_handler();

    let config = GenericConfig::<T>::load(&path)?;
    tracing::info!(server = %config.server_config.get_server_name(), "starting server");

    let health_check_port = config.health_check_port;
    let health_handle = tokio::spawn(async move {
        if let Err(err) = serve_health_check(health_check_port).await {
            tracing::error!(%err, "health check server exited");
        }
    });

    let run_result = config.server_config.run().await;

    health_handle.abort();
    run_result
}

async fn serve_health_check(port: u16) -> Result<()> {
    use warp::Filter;
    let metrics = warp::path("metrics").map(gather_metrics);
    let readiness = warp::path("readiness").map(|| "ok");
    let routes = metrics.or(readiness);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
    Ok(())
}

fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut buffer) {
        tracing::error!(%err, "failed to encode prometheus metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
