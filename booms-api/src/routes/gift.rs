use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::events_publish::{publish_balance_update, publish_social_outcome};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use booms_core::db::schema::{booms, gifts, real_balances, virtual_balances};
use booms_core::models::{Boom, Gift, GiftStatus, RealBalance, VirtualBalance};
use booms_core::pipelines::{accept_gift, decline_gift, send_gift};
use booms_core::BoomsError;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use rand::Rng;
use serde::{Deserialize, Serialize};

fn random_hex12() -> String {
    let bytes: [u8; 6] = rand::thread_rng().gen();
    hex::encode(bytes)
}

#[derive(Debug, Deserialize)]
pub struct SendGiftRequest {
    pub receiver_id: i64,
    pub holding_id: i64,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GiftResponse {
    pub gift_id: i64,
    pub status: String,
    pub net_amount: bigdecimal::BigDecimal,
}

pub async fn send(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<SendGiftRequest>,
) -> Result<Json<GiftResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let mut attempt_number = 0;
    let outcome = loop {
        let unix_ms = Utc::now().timestamp_millis();
        let random = random_hex12();
        let receiver_id = request.receiver_id;
        let holding_id = request.holding_id;
        let message = request.message.clone();
        let result = conn
            .transaction::<_, BoomsError, _>(|conn| {
                Box::pin(async move {
                    send_gift(conn, user_id, receiver_id, holding_id, message, unix_ms, &random).await
                })
            })
            .await;
        match result {
            Ok(v) => {
                booms_metrics::record_pipeline_outcome("gift_send", "ok");
                break v;
            }
            Err(BoomsError::TransientContended) if attempt_number < state.config.ledger.max_deadlock_retries => {
                booms_metrics::record_deadlock_retry("gift_send");
                tokio::time::sleep(state.config.ledger.retry_backoff(attempt_number)).await;
                attempt_number += 1;
            }
            Err(e) => {
                booms_metrics::record_pipeline_outcome("gift_send", e.code());
                return Err(e.into());
            }
        }
    };

    Ok(Json(GiftResponse {
        gift_id: outcome.gift.id,
        status: format!("{:?}", outcome.gift.status),
        net_amount: outcome.gift.net_amount,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GiftActionRequest {
    pub gift_id: i64,
}

pub async fn accept(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GiftActionRequest>,
) -> Result<Json<GiftResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let gift_id = request.gift_id;
    let outcome = conn
        .transaction::<_, BoomsError, _>(|conn| Box::pin(async move { accept_gift(conn, user_id, gift_id).await }))
        .await
        .map_err(ApiError)?;

    let boom: Boom =
        booms::table.find(outcome.receiver_holding.boom_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_social_outcome(&state.events, boom.id, boom.market_value(), boom.applied_micro_value, &outcome.social);

    let real: RealBalance = real_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    let virt: VirtualBalance =
        virtual_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_balance_update(&state.events, user_id, real.available, virt.balance);

    Ok(Json(GiftResponse {
        gift_id: outcome.gift.id,
        status: format!("{:?}", outcome.gift.status),
        net_amount: outcome.gift.net_amount,
    }))
}

pub async fn decline(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GiftActionRequest>,
) -> Result<Json<GiftResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let gift_id = request.gift_id;
    let gift: Gift = conn
        .transaction::<_, BoomsError, _>(|conn| Box::pin(async move { decline_gift(conn, user_id, gift_id).await }))
        .await
        .map_err(ApiError)?;
    Ok(Json(GiftResponse { gift_id: gift.id, status: format!("{:?}", gift.status), net_amount: gift.net_amount }))
}

pub async fn inbox(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GiftResponse>>, ApiError> {
    let mut conn = state.conn().await?;
    let pending: Vec<Gift> = gifts::table
        .filter(gifts::receiver_id.eq(user_id))
        .filter(gifts::status.eq(GiftStatus::Paid))
        .get_results(&mut conn)
        .await
        .map_err(BoomsError::from)?;
    Ok(Json(
        pending
            .into_iter()
            .map(|g| GiftResponse { gift_id: g.id, status: format!("{:?}", g.status), net_amount: g.net_amount })
            .collect(),
    ))
}
