mod auth;
mod error;
mod events_publish;
mod rate_limit;
mod routes;
mod state;

use crate::rate_limit::RateLimiters;
use crate::state::AppState;
use async_trait::async_trait;
use booms_core::config::{BoomsConfig, ProviderSecrets};
use booms_core::db::new_pool;
use booms_events::EventBus;
use clap::Parser;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use serde::Deserialize;
use server_framework::{run_server_with_config, RunnableConfig, ServerArgs};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Deserialize)]
struct ApiConfig {
    #[serde(flatten)]
    booms: BoomsConfig,
    #[serde(default = "default_port")]
    port: u16,
}

fn default_port() -> u16 {
    3000
}

#[async_trait]
impl RunnableConfig for ApiConfig {
    fn get_server_name(&self) -> String {
        "booms-api".to_string()
    }

    async fn run(&self) -> anyhow::Result<()> {
        let database_url = self.booms.database_url()?;
        let mut migration_conn = AsyncPgConnection::establish(&database_url).await?;
        booms_core::db::migrations::run_pending(&mut migration_conn).await?;

        let pool = new_pool(&database_url, 10).await?;
        let secrets = ProviderSecrets::from_env();
        let jwt_secret = secrets.secret_key.clone().unwrap_or_else(|| "booms-dev-secret".to_string());

        let rate_limiters = RateLimiters::new(&self.booms.rate_limits);

        let state = AppState {
            pool,
            config: Arc::new(self.booms.clone()),
            secrets: Arc::new(secrets),
            events: Arc::new(EventBus::new()),
            jwt_secret: Arc::new(jwt_secret),
            rate_limiters: Arc::new(rate_limiters),
        };

        let app = routes::router(state.clone())
            .merge(booms_events::ws_server::router(state.events.clone()))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", self.port)).await?;
        tracing::info!(port = self.port, "booms-api listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = ServerArgs::parse();
    run_server_with_config::<ApiConfig>(args.config_path).await
}
