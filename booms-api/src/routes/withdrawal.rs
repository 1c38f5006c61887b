use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::events_publish::publish_balance_update;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use bigdecimal::BigDecimal;
use booms_core::db::schema::{real_balances, virtual_balances};
use booms_core::models::{RealBalance, VirtualBalance};
use booms_core::pipelines::request_withdrawal;
use booms_core::BoomsError;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub holding_id: i64,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalValidateResponse {
    pub net_amount: BigDecimal,
}

pub async fn validate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<WithdrawalRequest>,
) -> Result<Json<WithdrawalValidateResponse>, ApiError> {
    state.rate_limiters.check_validation(user_id)?;
    let mut conn = state.conn().await?;
    let net_amount = booms_core::pipelines::withdrawal::validate(&mut conn, user_id, request.holding_id)
        .await
        .map_err(ApiError)?;
    Ok(Json(WithdrawalValidateResponse { net_amount }))
}

#[derive(Debug, Serialize)]
pub struct WithdrawalExecuteResponse {
    pub request_id: i64,
    pub net_amount: BigDecimal,
    pub user_gain: BigDecimal,
}

pub async fn execute(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<WithdrawalRequest>,
) -> Result<Json<WithdrawalExecuteResponse>, ApiError> {
    state.rate_limiters.check_withdrawal(user_id)?;
    let mut conn = state.conn().await?;
    let mut attempt_number = 0;
    let outcome = loop {
        let reference = format!("BOOMS-WITHDRAWAL-{}", Uuid::new_v4());
        let holding_id = request.holding_id;
        let result = conn
            .transaction::<_, BoomsError, _>(|conn| {
                Box::pin(async move { request_withdrawal(conn, user_id, holding_id, &reference).await })
            })
            .await;
        match result {
            Ok(v) => {
                booms_metrics::record_pipeline_outcome("withdrawal", "ok");
                break v;
            }
            Err(BoomsError::TransientContended) if attempt_number < state.config.ledger.max_deadlock_retries => {
                booms_metrics::record_deadlock_retry("withdrawal");
                tokio::time::sleep(state.config.ledger.retry_backoff(attempt_number)).await;
                attempt_number += 1;
            }
            Err(e) => {
                booms_metrics::record_pipeline_outcome("withdrawal", e.code());
                return Err(e.into());
            }
        }
    };

    let real: RealBalance = real_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    let virt: VirtualBalance =
        virtual_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_balance_update(&state.events, user_id, real.available, virt.balance);

    Ok(Json(WithdrawalExecuteResponse {
        request_id: outcome.request.id,
        net_amount: outcome.net_amount,
        user_gain: outcome.user_gain,
    }))
}
