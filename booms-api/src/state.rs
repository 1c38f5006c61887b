use crate::error::ApiError;
use crate::rate_limit::RateLimiters;
use booms_core::config::{BoomsConfig, ProviderSecrets};
use booms_core::db::{ArcDbPool, DbConn};
use booms_core::BoomsError;
use booms_events::EventBus;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: ArcDbPool,
    pub config: Arc<BoomsConfig>,
    pub secrets: Arc<ProviderSecrets>,
    pub events: Arc<EventBus>,
    pub jwt_secret: Arc<String>,
    pub rate_limiters: Arc<RateLimiters>,
}

impl AppState {
    pub async fn conn(&self) -> Result<DbConn<'_>, ApiError> {
        self.pool.get().await.map_err(|e| ApiError(BoomsError::Integrity(e.to_string())))
    }
}
