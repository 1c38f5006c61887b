//! C6 — secondary-market sale: a holder lists one of their holdings
//! and a buyer pays for it directly, in real cash, with the platform
//! taking a flat commission. Distinct from `purchase`, which mints a
//! fresh edition straight from the BOOM's own inventory.

use crate::db::locking::{ordered_user_ids, LockScope};
use crate::db::schema::{booms, holdings, real_balances};
use crate::errors::{BoomsError, BoomsResult};
use crate::inventory::{assert_owned, assert_tradeable};
use crate::models::{ActionType, Boom, Holding, NewHolding};
use crate::money::{decimal, round_value, zero};
use crate::social::{ActionMetadata, ActionOutcome};
use crate::{interactions, ledger};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;

#[derive(Debug)]
pub struct SaleOutcome {
    pub seller_holding: Holding,
    pub buyer_holding: Holding,
    pub net_to_seller: BigDecimal,
    pub fees: BigDecimal,
    pub social: ActionOutcome,
}

pub async fn sell_boom(
    conn: &mut AsyncPgConnection,
    seller_id: i64,
    buyer_id: i64,
    holding_id: i64,
    sell_price: &BigDecimal,
    reference: &str,
) -> BoomsResult<SaleOutcome> {
    if seller_id == buyer_id {
        return Err(BoomsError::Validation("seller and buyer must differ".into()));
    }
    if sell_price <= &zero() {
        return Err(BoomsError::Validation("sell_price must be positive".into()));
    }

    let mut scope = LockScope::new();

    scope.enter_holdings();
    let holding: Holding = holdings::table.find(holding_id).for_update().get_result(conn).await?;
    assert_owned(&holding, seller_id)?;
    assert_tradeable(&holding)?;

    scope.enter_booms();
    let boom: Boom = booms::table.find(holding.boom_id).for_update().get_result(conn).await?;

    let fees = round_value(&(sell_price * decimal("0.05")));
    let net_to_seller = sell_price - &fees;

    scope.enter_balances();
    let (first, second) = ordered_user_ids(seller_id, buyer_id);
    // Touch both balance rows in ascending user-id order before mutating
    // either, per the global lock-acquisition rule.
    for user_id in [first, second] {
        let _: BigDecimal =
            real_balances::table.find(user_id).select(real_balances::available).for_update().get_result(conn).await?;
    }

    ledger::debit_real(conn, buyer_id, sell_price, "boom_purchase_real", reference, "BOOM secondary purchase")
        .await?;
    ledger::credit_real(conn, seller_id, &net_to_seller, "boom_sell_real", reference, "BOOM sale proceeds").await?;

    scope.enter_treasury();
    ledger::credit_treasury(conn, &fees, "treasury_fee").await?;

    let now = Utc::now();
    let seller_holding: Holding = diesel::update(holdings::table.find(holding_id))
        .set((
            holdings::is_sold.eq(true),
            holdings::transferred_at.eq(now),
            holdings::receiver_id.eq(buyer_id),
            holdings::is_transferable.eq(false),
        ))
        .get_result(conn)
        .await?;

    let new_holding = NewHolding {
        owner_id: buyer_id,
        boom_id: boom.id,
        purchase_price: sell_price.clone(),
        fees_paid: fees.clone(),
        is_transferable: true,
        is_sold: false,
        receiver_id: None,
        transferred_at: None,
        last_gift_delivered_at: None,
        deleted_at: None,
        acquired_at: now,
    };
    let buyer_holding: Holding = diesel::insert_into(holdings::table).values(&new_holding).get_result(conn).await?;

    diesel::update(booms::table.find(boom.id))
        .set((
            booms::owner_id.eq(if boom.is_single_edition() { Some(buyer_id) } else { boom.owner_id }),
            booms::sell_count.eq(boom.sell_count + 1),
        ))
        .execute(conn)
        .await?;

    let social = interactions::record(
        conn,
        seller_id,
        boom.id,
        ActionType::Sell,
        Some(sell_price),
        ActionMetadata::default(),
        json!({ "holding_id": holding_id, "buyer_id": buyer_id, "sell_price": sell_price.to_string() }),
    )
    .await?;

    Ok(SaleOutcome { seller_holding, buyer_holding, net_to_seller, fees, social })
}
