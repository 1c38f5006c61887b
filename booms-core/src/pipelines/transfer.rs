//! Peer-to-peer holding transfer: moves a holding between two users
//! without a payment leg (distinct from a gift, which escrows the
//! holding and charges a fee). Used for account consolidation and
//! internal reassignments.

use crate::db::locking::{ordered_user_ids, LockScope};
use crate::db::schema::holdings;
use crate::errors::BoomsResult;
use crate::inventory::{assert_not_recently_gifted, assert_owned, assert_tradeable};
use crate::models::{ActionType, Holding};
use crate::social::{ActionMetadata, ActionOutcome};
use crate::interactions;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::json;

#[derive(Debug)]
pub struct TransferOutcome {
    pub holding: Holding,
    pub social: ActionOutcome,
}

pub async fn transfer_holding(
    conn: &mut AsyncPgConnection,
    sender_id: i64,
    receiver_id: i64,
    holding_id: i64,
) -> BoomsResult<TransferOutcome> {
    let mut scope = LockScope::new();

    scope.enter_holdings();
    let holding: Holding = holdings::table.find(holding_id).for_update().get_result(conn).await?;
    assert_owned(&holding, sender_id)?;
    assert_tradeable(&holding)?;
    let now = Utc::now();
    assert_not_recently_gifted(&holding, now)?;

    scope.enter_balances();
    let (_first, _second) = ordered_user_ids(sender_id, receiver_id);

    let updated_holding: Holding = diesel::update(holdings::table.find(holding_id))
        .set((
            holdings::owner_id.eq(receiver_id),
            holdings::transferred_at.eq(now),
        ))
        .get_result(conn)
        .await?;

    let social = interactions::record(
        conn,
        sender_id,
        holding.boom_id,
        ActionType::ShareInternal,
        None,
        ActionMetadata::default(),
        json!({ "holding_id": holding_id, "receiver_id": receiver_id }),
    )
    .await?;

    Ok(TransferOutcome { holding: updated_holding, social })
}
