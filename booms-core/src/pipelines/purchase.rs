//! C5 — primary-market purchase: a user mints an edition of a BOOM
//! directly from the platform.

use crate::db::locking::LockScope;
use crate::db::schema::{booms, holdings, users};
use crate::errors::{BoomsError, BoomsResult};
use crate::fees::boom_purchase_commission;
use crate::inventory::{mint_edition, EditionState};
use crate::models::{ActionType, Boom, Holding, LoyaltyTier, NewHolding};
use crate::social::{ActionMetadata, ActionOutcome};
use crate::{interactions, ledger};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;

#[derive(Debug)]
pub struct PurchaseOutcome {
    pub holdings: Vec<Holding>,
    pub market_value: BigDecimal,
    pub per_unit_fee: BigDecimal,
    pub total_cost: BigDecimal,
    pub social: ActionOutcome,
}

pub async fn purchase_boom(
    conn: &mut AsyncPgConnection,
    buyer_id: i64,
    boom_id: i64,
    quantity: i32,
    reference: &str,
) -> BoomsResult<PurchaseOutcome> {
    if quantity < 1 {
        return Err(BoomsError::Validation("quantity must be at least 1".into()));
    }

    let mut scope = LockScope::new();

    scope.enter_booms();
    let boom: Boom = booms::table.find(boom_id).for_update().get_result(conn).await?;
    if !boom.is_active {
        return Err(BoomsError::BoomUnavailable);
    }
    if !boom.has_available_stock(quantity) {
        return Err(BoomsError::StockExhausted);
    }

    let tier: LoyaltyTier = users::table.find(buyer_id).select(users::loyalty_tier).get_result(conn).await?;
    let market_value = boom.market_value();
    let per_unit_fee = boom_purchase_commission(&market_value, tier);
    let total_fee = &per_unit_fee * quantity;
    let total_cost = (&market_value + &per_unit_fee) * quantity;

    scope.enter_balances();
    ledger::debit_real(conn, buyer_id, &total_cost, "boom_purchase_real", reference, "BOOM purchase").await?;

    scope.enter_treasury();
    ledger::credit_treasury(conn, &total_fee, "treasury_fee").await?;

    let mut edition_state = EditionState {
        max_editions: boom.max_editions,
        current_edition: boom.current_edition,
        available_editions: boom.available_editions,
    };
    let now = Utc::now();

    scope.enter_holdings();
    let mut holdings_out = Vec::with_capacity(quantity as usize);
    for _ in 0..quantity {
        mint_edition(&mut edition_state)?;
        let new_holding = NewHolding {
            owner_id: buyer_id,
            boom_id,
            purchase_price: market_value.clone(),
            fees_paid: per_unit_fee.clone(),
            is_transferable: true,
            is_sold: false,
            receiver_id: None,
            transferred_at: None,
            last_gift_delivered_at: None,
            deleted_at: None,
            acquired_at: now,
        };
        let holding: Holding = diesel::insert_into(holdings::table).values(&new_holding).get_result(conn).await?;
        holdings_out.push(holding);
    }

    diesel::update(booms::table.find(boom_id))
        .set((
            booms::current_edition.eq(edition_state.current_edition),
            booms::available_editions.eq(edition_state.available_editions),
            booms::owner_id.eq(if boom.is_single_edition() { Some(buyer_id) } else { boom.owner_id }),
            booms::buy_count.eq(boom.buy_count + 1),
            booms::unique_holders.eq(boom.unique_holders + 1),
        ))
        .execute(conn)
        .await?;

    let social = interactions::record(
        conn,
        buyer_id,
        boom_id,
        ActionType::Buy,
        Some(&total_cost),
        ActionMetadata::default(),
        json!({ "holding_ids": holdings_out.iter().map(|h| h.id).collect::<Vec<_>>(), "quantity": quantity }),
    )
    .await?;

    Ok(PurchaseOutcome { holdings: holdings_out, market_value, per_unit_fee, total_cost, social })
}
