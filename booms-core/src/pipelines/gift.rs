//! C7 — gifting: escrow a holding, charge the sender the gift's total
//! fees up front, then either deliver it to the receiver (minting them
//! a fresh holding and crediting the gift's net value) or release the
//! escrow back. Fees are not refunded on decline or expiry (an Open
//! Question resolved in favor of the simpler, fraud-resistant rule).

use crate::db::locking::LockScope;
use crate::db::schema::{booms, gifts, holdings, users};
use crate::errors::{BoomsError, BoomsResult};
use crate::fees::{gift_fee, sharing_fee};
use crate::inventory::{assert_not_recently_gifted, assert_owned, assert_tradeable};
use crate::models::gift::generate_transaction_reference;
use crate::models::{ActionType, Boom, Gift, GiftStatus, Holding, LoyaltyTier, NewGift, NewHolding};
use crate::money::zero;
use crate::social::{ActionMetadata, ActionOutcome};
use crate::{interactions, ledger};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;

#[derive(Debug)]
pub struct GiftSendOutcome {
    pub gift: Gift,
}

pub async fn send_gift(
    conn: &mut AsyncPgConnection,
    sender_id: i64,
    receiver_id: i64,
    holding_id: i64,
    message: Option<String>,
    unix_ms: i64,
    random_hex12: &str,
) -> BoomsResult<GiftSendOutcome> {
    if sender_id == receiver_id {
        return Err(BoomsError::Validation("sender and receiver must differ".into()));
    }

    let mut scope = LockScope::new();

    scope.enter_holdings();
    let holding: Holding = holdings::table.find(holding_id).for_update().get_result(conn).await?;
    assert_owned(&holding, sender_id)?;
    assert_tradeable(&holding)?;
    let now = Utc::now();
    assert_not_recently_gifted(&holding, now)?;

    scope.enter_booms();
    let boom: Boom = booms::table.find(holding.boom_id).for_update().get_result(conn).await?;
    let market_value = boom.market_value();

    let sender_tier: LoyaltyTier = users::table.find(sender_id).select(users::loyalty_tier).get_result(conn).await?;
    let sharing = sharing_fee(&market_value, sender_tier);
    let gift_cost = gift_fee(&market_value);
    let total_fees = &sharing + &gift_cost;
    let net_amount = market_value;

    scope.enter_balances();
    let reference = generate_transaction_reference(unix_ms, random_hex12);
    let debit_tx_id =
        ledger::debit_real(conn, sender_id, &total_fees, "gift_sent_real", &reference, "gift sharing fee + gift fee")
            .await?;

    diesel::update(holdings::table.find(holding_id))
        .set((holdings::is_transferable.eq(false), holdings::transferred_at.eq(now)))
        .execute(conn)
        .await?;

    let new_gift = NewGift {
        sender_id,
        receiver_id,
        holding_id,
        message,
        status: GiftStatus::Paid,
        gross_amount: total_fees.clone(),
        fee_amount: total_fees,
        net_amount,
        transaction_reference: reference,
        wallet_transaction_ids: vec![debit_tx_id],
        created_at: now,
        expires_at: Some(now + Duration::days(7)),
    };
    let gift: Gift = diesel::insert_into(gifts::table).values(&new_gift).get_result(conn).await?;

    Ok(GiftSendOutcome { gift })
}

#[derive(Debug)]
pub struct GiftAcceptOutcome {
    pub gift: Gift,
    pub receiver_holding: Holding,
    pub social: ActionOutcome,
}

pub async fn accept_gift(
    conn: &mut AsyncPgConnection,
    receiver_id: i64,
    gift_id: i64,
) -> BoomsResult<GiftAcceptOutcome> {
    let gift: Gift = gifts::table.find(gift_id).for_update().get_result(conn).await?;
    if gift.receiver_id != receiver_id {
        return Err(BoomsError::Forbidden);
    }
    gift.status.validate_transition(GiftStatus::Delivered)?;
    if let Some(expires_at) = gift.expires_at {
        if Utc::now() > expires_at {
            return Err(BoomsError::GiftExpired);
        }
    }

    let mut scope = LockScope::new();

    scope.enter_booms();
    let escrow_preview: Holding = holdings::table.find(gift.holding_id).get_result(conn).await?;
    let boom: Boom = booms::table.find(escrow_preview.boom_id).for_update().get_result(conn).await?;
    let market_value = boom.market_value();

    scope.enter_holdings();
    let escrow_holding: Holding = holdings::table.find(gift.holding_id).for_update().get_result(conn).await?;

    let now = Utc::now();
    let purchase_price = [gift.net_amount.clone(), escrow_holding.purchase_price.clone(), market_value]
        .into_iter()
        .max()
        .expect("non-empty literal array always has a max");

    diesel::update(holdings::table.find(gift.holding_id))
        .set(holdings::is_sold.eq(true))
        .execute(conn)
        .await?;

    let new_holding = NewHolding {
        owner_id: receiver_id,
        boom_id: boom.id,
        purchase_price,
        fees_paid: zero(),
        is_transferable: true,
        is_sold: false,
        receiver_id: None,
        transferred_at: None,
        last_gift_delivered_at: Some(now),
        deleted_at: None,
        acquired_at: now,
    };
    let receiver_holding: Holding = diesel::insert_into(holdings::table).values(&new_holding).get_result(conn).await?;

    let social = interactions::record(
        conn,
        receiver_id,
        boom.id,
        ActionType::Gift,
        None,
        ActionMetadata::default(),
        json!({ "gift_id": gift_id, "channel": "gift_new_flow" }),
    )
    .await?;

    interactions::record(
        conn,
        receiver_id,
        boom.id,
        ActionType::ShareInternal,
        Some(&gift.net_amount),
        ActionMetadata::default(),
        json!({ "gift_id": gift_id, "internal_share": true }),
    )
    .await?;

    scope.enter_balances();
    let credit_tx_id = ledger::credit_real(
        conn,
        receiver_id,
        &gift.net_amount,
        "gift_received_real",
        &gift.transaction_reference,
        "gift received",
    )
    .await?;

    scope.enter_treasury();
    ledger::credit_treasury(conn, &gift.fee_amount, "treasury_fee").await?;

    let mut wallet_transaction_ids = gift.wallet_transaction_ids.clone();
    wallet_transaction_ids.push(credit_tx_id);

    let updated_gift: Gift = diesel::update(gifts::table.find(gift_id))
        .set((
            gifts::status.eq(GiftStatus::Delivered),
            gifts::delivered_at.eq(now),
            gifts::wallet_transaction_ids.eq(wallet_transaction_ids),
        ))
        .get_result(conn)
        .await?;

    Ok(GiftAcceptOutcome { gift: updated_gift, receiver_holding, social })
}

pub async fn decline_gift(conn: &mut AsyncPgConnection, receiver_id: i64, gift_id: i64) -> BoomsResult<Gift> {
    let gift: Gift = gifts::table.find(gift_id).for_update().get_result(conn).await?;
    if gift.receiver_id != receiver_id {
        return Err(BoomsError::Forbidden);
    }
    gift.status.validate_transition(GiftStatus::Failed)?;

    let mut scope = LockScope::new();
    scope.enter_holdings();
    diesel::update(holdings::table.find(gift.holding_id))
        .set((
            holdings::is_transferable.eq(true),
            holdings::is_sold.eq(false),
            holdings::receiver_id.eq(None::<i64>),
            holdings::transferred_at.eq(None::<chrono::DateTime<Utc>>),
        ))
        .execute(conn)
        .await?;

    let now = Utc::now();
    let updated_gift: Gift = diesel::update(gifts::table.find(gift_id))
        .set((gifts::status.eq(GiftStatus::Failed), gifts::failed_at.eq(now)))
        .get_result(conn)
        .await?;

    Ok(updated_gift)
}
