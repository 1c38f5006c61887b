//! Interaction recording (C11): persists a raw user action and folds
//! its social-value impact into the target BOOM in the same
//! transaction, so a crashed pipeline never leaves an interaction
//! un-applied or double-applied.

use crate::db::schema::{booms, interactions};
use crate::errors::BoomsResult;
use crate::models::{ActionType, Boom};
use crate::social::{self, ActionMetadata, ActionOutcome, SocialState};
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde_json::Value;

fn state_from_boom(boom: &Boom) -> SocialState {
    SocialState {
        social_accumulator: boom.social_accumulator.clone(),
        applied_micro_value: boom.applied_micro_value.clone(),
        palier_threshold: boom.palier_threshold.clone(),
        palier_level: boom.palier_level,
        current_social_value: boom.current_social_value.clone(),
        treasury_pool: boom.treasury_pool.clone(),
        redistribution_pool: boom.redistribution_pool.clone(),
        share_count_24h: boom.share_count_24h,
        last_interaction_at: boom.last_interaction_at,
        created_at: boom.created_at,
    }
}

/// Records `action` against `boom_id` by `user_id`, applies the social-
/// value engine, persists the updated BOOM row, and returns the
/// resulting outcome (including any detected event) for the caller to
/// broadcast.
///
/// `reference_amount` is the per-action reference base from spec.md
/// §4.2's table (the transaction amount for a buy/sell). Pass `None`
/// to fall back to the just-locked BOOM's own fields: `base_price` for
/// every action except `ShareInternal`, which falls back to the
/// current market value.
pub async fn record(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    boom_id: i64,
    action: ActionType,
    reference_amount: Option<&BigDecimal>,
    social_metadata: ActionMetadata,
    metadata: Value,
) -> BoomsResult<ActionOutcome> {
    let boom: Boom = booms::table.find(boom_id).for_update().get_result(conn).await?;
    let reference = match reference_amount {
        Some(amount) => amount.clone(),
        None if action == ActionType::ShareInternal => boom.market_value(),
        None => boom.base_price.clone(),
    };
    let mut state = state_from_boom(&boom);
    let now = Utc::now();
    let outcome = social::apply_action(&mut state, action, &reference, &social_metadata, now);

    let share_count_24h = if matches!(action, ActionType::Share | ActionType::ShareInternal) {
        boom.share_count_24h + 1
    } else {
        boom.share_count_24h
    };

    diesel::update(booms::table.find(boom_id))
        .set((
            booms::social_accumulator.eq(&state.social_accumulator),
            booms::applied_micro_value.eq(&state.applied_micro_value),
            booms::palier_level.eq(state.palier_level),
            booms::current_social_value.eq(&state.current_social_value),
            booms::treasury_pool.eq(&state.treasury_pool),
            booms::redistribution_pool.eq(&state.redistribution_pool),
            booms::share_count_24h.eq(share_count_24h),
            booms::interaction_count.eq(boom.interaction_count + 1),
            booms::last_interaction_at.eq(now),
        ))
        .execute(conn)
        .await?;

    diesel::insert_into(interactions::table)
        .values((
            interactions::user_id.eq(user_id),
            interactions::boom_id.eq(boom_id),
            interactions::action_type.eq(action),
            interactions::metadata.eq(metadata),
            interactions::processed.eq(true),
            interactions::created_at.eq(now),
        ))
        .execute(conn)
        .await?;

    Ok(outcome)
}
