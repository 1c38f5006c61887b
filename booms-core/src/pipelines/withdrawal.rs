//! C8 — BOOM withdrawal: a holder cashes a holding out of the platform
//! entirely, receiving its current market value (less the withdrawal
//! commission) as a real-balance credit and an auditable
//! `withdrawal_requests` row (the SPEC_FULL-supplemented trail
//! grounded in the original `BomWithdrawalRequest` model). The
//! treasury absorbs any appreciation the holder realizes above their
//! original purchase price, on top of collecting the flat commission.

use crate::db::locking::LockScope;
use crate::db::schema::{booms, holdings, withdrawal_requests};
use crate::errors::{BoomsError, BoomsResult};
use crate::fees::boom_withdrawal_commission;
use crate::inventory::{assert_owned, assert_tradeable};
use crate::ledger;
use crate::models::{Boom, Holding, NewWithdrawalRequest, WithdrawalRequest};
use crate::money::{decimal, zero};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

const MIN_WITHDRAWAL: &str = "1000";
const MAX_WITHDRAWAL: &str = "1000000";

fn assert_within_bounds(amount: &BigDecimal) -> BoomsResult<()> {
    if *amount < decimal(MIN_WITHDRAWAL) || *amount > decimal(MAX_WITHDRAWAL) {
        return Err(BoomsError::Validation(format!(
            "withdrawal amount {amount} outside [{MIN_WITHDRAWAL}, {MAX_WITHDRAWAL}]"
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct WithdrawalOutcome {
    pub request: WithdrawalRequest,
    pub net_amount: bigdecimal::BigDecimal,
    pub user_gain: bigdecimal::BigDecimal,
}

/// Validates that a withdrawal would succeed without mutating any
/// state — used by the `/withdrawal/bom/validate` endpoint before the
/// user confirms.
pub async fn validate(conn: &mut AsyncPgConnection, user_id: i64, holding_id: i64) -> BoomsResult<bigdecimal::BigDecimal> {
    let holding: Holding = holdings::table.find(holding_id).get_result(conn).await?;
    assert_owned(&holding, user_id)?;
    assert_tradeable(&holding)?;
    let boom: Boom = booms::table.find(holding.boom_id).get_result(conn).await?;
    let market_value = boom.market_value();
    assert_within_bounds(&market_value)?;
    let commission = boom_withdrawal_commission(&market_value);
    Ok(&market_value - &commission)
}

pub async fn request_withdrawal(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    holding_id: i64,
    reference: &str,
) -> BoomsResult<WithdrawalOutcome> {
    let mut scope = LockScope::new();

    scope.enter_booms();
    let holding_preview: Holding = holdings::table.find(holding_id).get_result(conn).await?;
    let boom: Boom = booms::table.find(holding_preview.boom_id).for_update().get_result(conn).await?;

    scope.enter_holdings();
    let holding: Holding = holdings::table.find(holding_id).for_update().get_result(conn).await?;
    assert_owned(&holding, user_id)?;
    assert_tradeable(&holding)?;

    let market_value = boom.market_value();
    assert_within_bounds(&market_value)?;
    let commission = boom_withdrawal_commission(&market_value);
    let net_amount = &market_value - &commission;
    let user_gain = &market_value - &holding.purchase_price;
    let now = Utc::now();

    scope.enter_balances();
    ledger::credit_real(conn, user_id, &net_amount, "boom_sell_real", reference, "BOOM withdrawal payout").await?;

    scope.enter_treasury();
    ledger::credit_treasury(conn, &commission, "treasury_fee").await?;
    if user_gain > zero() {
        ledger::debit_treasury(conn, &user_gain).await?;
    }

    diesel::update(holdings::table.find(holding_id))
        .set((holdings::is_sold.eq(true), holdings::deleted_at.eq(now)))
        .execute(conn)
        .await?;

    diesel::update(booms::table.find(boom.id))
        .set(booms::unique_holders.eq((boom.unique_holders - 1).max(0)))
        .execute(conn)
        .await?;

    let new_request = NewWithdrawalRequest {
        user_id,
        holding_id,
        requested_amount: market_value,
        fees: commission,
        net_amount: net_amount.clone(),
        status: "completed".to_string(),
        created_at: now,
    };
    let request: WithdrawalRequest = diesel::insert_into(withdrawal_requests::table)
        .values(&new_request)
        .get_result(conn)
        .await?;

    Ok(WithdrawalOutcome { request, net_amount, user_gain })
}
