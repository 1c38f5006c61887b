use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use bigdecimal::BigDecimal;
use booms_core::db::schema::{real_balances, virtual_balances};
use booms_core::models::{RealBalance, VirtualBalance};
use booms_core::BoomsError;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CashBalanceResponse {
    pub available: BigDecimal,
    pub locked: BigDecimal,
}

pub async fn cash_balance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CashBalanceResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let balance: RealBalance = real_balances::table
        .find(user_id)
        .get_result(&mut conn)
        .await
        .map_err(BoomsError::from)?;
    Ok(Json(CashBalanceResponse { available: balance.available, locked: balance.locked }))
}

#[derive(Debug, Serialize)]
pub struct DualBalanceResponse {
    pub real_available: BigDecimal,
    pub real_locked: BigDecimal,
    pub virtual_balance: BigDecimal,
}

pub async fn dual_balance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DualBalanceResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let real: RealBalance = real_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    let virt: VirtualBalance =
        virtual_balances::table.find(user_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    Ok(Json(DualBalanceResponse {
        real_available: real.available,
        real_locked: real.locked,
        virtual_balance: virt.balance,
    }))
}
