//! Background sweeper: transitions PAID gifts past their `expires_at`
//! to EXPIRED (restoring the escrowed holding) and CREATED gifts
//! abandoned before payment to FAILED. Runs on a fixed interval rather
//! than reacting to individual events, since expiry is a time-based
//! condition no single pipeline invocation observes on its own.

use anyhow::Result;
use async_trait::async_trait;
use booms_core::db::{new_pool, ArcDbPool};
use booms_core::db::schema::{gifts, holdings};
use booms_core::models::GiftStatus;
use chrono::{Duration, Utc};
use clap::Parser;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use server_framework::{run_server_with_config, RunnableConfig, ServerArgs};

const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
const CREATED_GIFT_TIMEOUT: Duration = Duration::minutes(30);

#[derive(Debug, Deserialize)]
pub struct SweeperConfig {
    pub database_url_env: String,
    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,
}

fn default_pool_size() -> u32 {
    4
}

#[async_trait]
impl RunnableConfig for SweeperConfig {
    fn get_server_name(&self) -> String {
        "booms-sweeper".to_string()
    }

    async fn run(&self) -> Result<()> {
        let database_url = std::env::var(&self.database_url_env)?;
        let pool = new_pool(&database_url, self.db_pool_size).await?;
        loop {
            if let Err(err) = sweep_once(&pool).await {
                tracing::error!(%err, "sweep cycle failed");
            }
            tokio::time::sleep(SWEEP_INTERVAL).await;
        }
    }
}

async fn sweep_once(pool: &ArcDbPool) -> Result<()> {
    let mut conn = pool.get().await?;
    let now = Utc::now();

    let expired_gift_ids: Vec<(i64, i64)> = gifts::table
        .filter(gifts::status.eq(GiftStatus::Paid))
        .filter(gifts::expires_at.lt(now))
        .select((gifts::id, gifts::holding_id))
        .load(&mut conn)
        .await?;

    for (gift_id, holding_id) in &expired_gift_ids {
        diesel::update(gifts::table.find(gift_id))
            .set(gifts::status.eq(GiftStatus::Expired))
            .execute(&mut conn)
            .await?;
        diesel::update(holdings::table.find(holding_id))
            .set((holdings::is_transferable.eq(true), holdings::transferred_at.eq(None::<chrono::DateTime<Utc>>)))
            .execute(&mut conn)
            .await?;
        booms_metrics::record_pipeline_outcome("gift_expiry_sweep", "expired");
    }

    let stale_cutoff = now - CREATED_GIFT_TIMEOUT;
    let failed_count = diesel::update(
        gifts::table
            .filter(gifts::status.eq(GiftStatus::Created))
            .filter(gifts::created_at.lt(stale_cutoff)),
    )
    .set(gifts::status.eq(GiftStatus::Failed))
    .execute(&mut conn)
    .await?;
    for _ in 0..failed_count {
        booms_metrics::record_pipeline_outcome("gift_creation_sweep", "failed");
    }

    tracing::info!(
        expired = expired_gift_ids.len(),
        failed_created = failed_count,
        "sweep cycle complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    run_server_with_config::<SweeperConfig>(args.config_path).await
}
