use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::events_publish::{publish_balance_update, publish_social_outcome};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use bigdecimal::BigDecimal;
use booms_core::db::schema::{booms, real_balances, virtual_balances};
use booms_core::models::{Boom, RealBalance, VirtualBalance};
use booms_core::pipelines::{purchase_boom, sell_boom};
use booms_core::BoomsError;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub boom_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub holding_ids: Vec<i64>,
    pub market_value: bigdecimal::BigDecimal,
    pub per_unit_fee: bigdecimal::BigDecimal,
    pub total_cost: bigdecimal::BigDecimal,
}

pub async fn purchase(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let mut attempt_number = 0;
    let outcome = loop {
        let reference = format!("BOOMS-PURCHASE-{}", Uuid::new_v4());
        let boom_id = request.boom_id;
        let quantity = request.quantity;
        let result = conn
            .transaction::<_, BoomsError, _>(|conn| {
                Box::pin(async move { purchase_boom(conn, user_id, boom_id, quantity, &reference).await })
            })
            .await;
        match result {
            Ok(v) => {
                booms_metrics::record_pipeline_outcome("purchase", "ok");
                break v;
            }
            Err(BoomsError::TransientContended) if attempt_number < state.config.ledger.max_deadlock_retries => {
                booms_metrics::record_deadlock_retry("purchase");
                tokio::time::sleep(state.config.ledger.retry_backoff(attempt_number)).await;
                attempt_number += 1;
            }
            Err(e) => {
                booms_metrics::record_pipeline_outcome("purchase", e.code());
                return Err(e.into());
            }
        }
    };

    let boom: Boom = booms::table.find(request.boom_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_social_outcome(&state.events, request.boom_id, boom.market_value(), boom.applied_micro_value, &outcome.social);

    let real: RealBalance = real_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    let virt: VirtualBalance =
        virtual_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_balance_update(&state.events, user_id, real.available, virt.balance);

    Ok(Json(PurchaseResponse {
        holding_ids: outcome.holdings.iter().map(|h| h.id).collect(),
        market_value: outcome.market_value,
        per_unit_fee: outcome.per_unit_fee,
        total_cost: outcome.total_cost,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub buyer_id: i64,
    pub holding_id: i64,
    pub sell_price: bigdecimal::BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct SellResponse {
    pub buyer_holding_id: i64,
    pub net_to_seller: bigdecimal::BigDecimal,
    pub fees: bigdecimal::BigDecimal,
}

pub async fn sell(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<SellRequest>,
) -> Result<Json<SellResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let mut attempt_number = 0;
    let outcome = loop {
        let reference = format!("BOOMS-SALE-{}", Uuid::new_v4());
        let holding_id = request.holding_id;
        let buyer_id = request.buyer_id;
        let sell_price = request.sell_price.clone();
        let result = conn
            .transaction::<_, BoomsError, _>(|conn| {
                Box::pin(async move { sell_boom(conn, user_id, buyer_id, holding_id, &sell_price, &reference).await })
            })
            .await;
        match result {
            Ok(v) => {
                booms_metrics::record_pipeline_outcome("sale", "ok");
                break v;
            }
            Err(BoomsError::TransientContended) if attempt_number < state.config.ledger.max_deadlock_retries => {
                booms_metrics::record_deadlock_retry("sale");
                tokio::time::sleep(state.config.ledger.retry_backoff(attempt_number)).await;
                attempt_number += 1;
            }
            Err(e) => {
                booms_metrics::record_pipeline_outcome("sale", e.code());
                return Err(e.into());
            }
        }
    };

    let boom: Boom =
        booms::table.find(outcome.seller_holding.boom_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_social_outcome(&state.events, boom.id, boom.market_value(), boom.applied_micro_value, &outcome.social);

    let real: RealBalance = real_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    let virt: VirtualBalance =
        virtual_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_balance_update(&state.events, user_id, real.available, virt.balance);

    Ok(Json(SellResponse {
        buyer_holding_id: outcome.buyer_holding.id,
        net_to_seller: outcome.net_to_seller,
        fees: outcome.fees,
    }))
}

#[derive(Debug, Serialize)]
pub struct BoomStatsResponse {
    pub market_value: BigDecimal,
    pub applied_micro_value: BigDecimal,
    pub palier_level: i32,
    pub social_accumulator: BigDecimal,
    pub active_event: Option<String>,
    pub unique_holders: i32,
    pub buy_count: i32,
    pub sell_count: i32,
    pub share_count_24h: i32,
}

/// Read-only market snapshot for a single BOOM, browsable without
/// authentication. Eventual consistency is acceptable here (spec.md
/// §5's shared-resource policy): no lock is taken for the read.
pub async fn stats(
    State(state): State<AppState>,
    Path(boom_id): Path<i64>,
) -> Result<Json<BoomStatsResponse>, ApiError> {
    state.rate_limiters.check_stats(&boom_id.to_string())?;
    let mut conn = state.conn().await?;
    let boom: Boom = booms::table.find(boom_id).get_result(&mut conn).await.map_err(BoomsError::from)?;

    Ok(Json(BoomStatsResponse {
        market_value: boom.market_value(),
        applied_micro_value: boom.applied_micro_value,
        palier_level: boom.palier_level,
        social_accumulator: boom.social_accumulator,
        active_event: boom.active_event.map(|e| format!("{e:?}")),
        unique_holders: boom.unique_holders,
        buy_count: boom.buy_count,
        sell_count: boom.sell_count,
        share_count_24h: boom.share_count_24h,
    }))
}
