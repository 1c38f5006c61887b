//! Social-value engine (C2): a pure, I/O-free transformation from a
//! single user action into a BOOM's updated accumulator, micro-value
//! and pool balances. Kept free of any database handle so it can be
//! exercised directly by property tests.

use crate::models::ActionType;
use crate::money::{round_accumulator, round_to_i32, round_value, zero};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;

fn d(literal: &str) -> BigDecimal {
    BigDecimal::from_str(literal).expect("literal must be a valid decimal")
}

/// Per-action weight, expressed as a fraction of the BOOM's current
/// palier threshold. `ActionType::ShareInternal` carries the weight the
/// original engine assigns to peer-to-peer transfers, since transfers
/// are recorded as internal shares rather than a distinct action kind.
fn weight(action: ActionType) -> BigDecimal {
    match action {
        ActionType::Buy => d("0.002"),
        ActionType::Sell => d("-0.001"),
        ActionType::Share => d("0.0001"),
        ActionType::Gift => d("0.0003"),
        ActionType::Like => d("0.0001"),
        ActionType::Comment => d("0.0001"),
        ActionType::View => d("0.00005"),
        ActionType::ShareInternal => d("0.00002"),
    }
}

/// `max(0.01, palier_threshold * 0.0002)` — the FCFA amount a single
/// palier crossing adds to (or removes from) `applied_micro_value`.
pub fn micro_unit(palier_threshold: &BigDecimal) -> BigDecimal {
    let scaled = palier_threshold * d("0.0002");
    if scaled > d("0.01") {
        scaled
    } else {
        d("0.01")
    }
}

/// `min(0.5, (days_inactive - 1) * 0.01)`; zero for `days_inactive <= 1`.
pub fn decay_ratio(days_inactive: i64) -> BigDecimal {
    if days_inactive <= 1 {
        return zero();
    }
    let ratio = d(&(days_inactive - 1).to_string()) * d("0.01");
    if ratio > d("0.5") {
        d("0.5")
    } else {
        ratio
    }
}

/// The mutable social fields of a BOOM, decoupled from the diesel model
/// so the engine can run without a database connection.
#[derive(Debug, Clone)]
pub struct SocialState {
    pub social_accumulator: BigDecimal,
    pub applied_micro_value: BigDecimal,
    pub palier_threshold: BigDecimal,
    pub palier_level: i32,
    pub current_social_value: BigDecimal,
    pub treasury_pool: BigDecimal,
    pub redistribution_pool: BigDecimal,
    pub share_count_24h: i32,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialEvent {
    Viral,
    Trending,
    New,
    Milestone,
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub impact: BigDecimal,
    pub old_micro: BigDecimal,
    pub new_micro: BigDecimal,
    pub delta_micro: BigDecimal,
    pub paliers_crossed: i32,
    pub event: Option<SocialEvent>,
}

/// Caller-supplied overrides for a single action's impact (spec.md
/// §4.2's `metadata` parameter). `boost_multiplier` scales the
/// weight-table result; `override_social_impact` bypasses the weight
/// table entirely and is used as the impact value as-is.
#[derive(Debug, Clone, Default)]
pub struct ActionMetadata {
    pub boost_multiplier: Option<BigDecimal>,
    pub override_social_impact: Option<BigDecimal>,
}

/// Applies decay for the elapsed inactivity window, then folds in the
/// weighted impact of `action` against `reference_amount` — the
/// per-action reference base from spec.md §4.2's table (e.g. the
/// transaction amount for a buy/sell, the BOOM's base price for a
/// share/gift/like/comment/view) — crossing (or reversing across)
/// paliers as the accumulator moves past `palier_threshold` in either
/// direction.
pub fn apply_action(
    state: &mut SocialState,
    action: ActionType,
    reference_amount: &BigDecimal,
    metadata: &ActionMetadata,
    now: DateTime<Utc>,
) -> ActionOutcome {
    apply_decay(state, now);

    let impact = match &metadata.override_social_impact {
        Some(value) => round_accumulator(value),
        None => {
            let boost = metadata.boost_multiplier.clone().unwrap_or_else(|| d("1"));
            round_accumulator(&(reference_amount * weight(action) * boost))
        }
    };
    let old_micro = round_value(&state.applied_micro_value);
    let old_social_value = state.current_social_value.clone();

    state.social_accumulator = &state.social_accumulator + &impact;
    state.current_social_value = round_value(&(&state.current_social_value + &impact));

    let mut paliers_crossed = 0i32;
    while state.social_accumulator >= state.palier_threshold {
        state.social_accumulator = &state.social_accumulator - &state.palier_threshold;
        state.palier_level += 1;
        state.applied_micro_value = &state.applied_micro_value + micro_unit(&state.palier_threshold);
        paliers_crossed += 1;
    }
    while state.social_accumulator < zero() && state.palier_level > 0 {
        state.social_accumulator = &state.social_accumulator + &state.palier_threshold;
        state.palier_level -= 1;
        state.applied_micro_value = &state.applied_micro_value - micro_unit(&state.palier_threshold);
        paliers_crossed -= 1;
    }
    if state.applied_micro_value < zero() {
        state.applied_micro_value = zero();
    }

    if impact > zero() {
        let split = round_accumulator(&(&impact * d("0.10")));
        let half = round_accumulator(&(&split / d("2")));
        state.treasury_pool = &state.treasury_pool + &half;
        state.redistribution_pool = &state.redistribution_pool + &half;
    }

    state.applied_micro_value = round_value(&state.applied_micro_value);
    state.social_accumulator = round_accumulator(&state.social_accumulator);
    state.last_interaction_at = Some(now);

    let new_micro = state.applied_micro_value.clone();
    let delta_micro = &new_micro - &old_micro;
    let event = detect_event(state, old_social_value, now);

    ActionOutcome { impact, old_micro, new_micro, delta_micro, paliers_crossed, event }
}

fn apply_decay(state: &mut SocialState, now: DateTime<Utc>) {
    let Some(last) = state.last_interaction_at else { return };
    let days_inactive = (now - last).num_days();
    let ratio = decay_ratio(days_inactive);
    if ratio > zero() {
        let retained = d("1") - ratio;
        state.applied_micro_value = round_value(&(&state.applied_micro_value * &retained));
        state.current_social_value = round_value(&(&state.current_social_value * &retained));
        state.social_accumulator = round_accumulator(&(&state.social_accumulator * &retained));

        let unit = micro_unit(&state.palier_threshold);
        state.palier_level = if unit > zero() {
            round_to_i32(&(&state.applied_micro_value / &unit))
        } else {
            0
        };
    }
}

/// Priority order per the event taxonomy: an unusually active BOOM is
/// reported as viral/trending even if it also happens to be new or has
/// just crossed a milestone.
fn detect_event(state: &SocialState, old_social_value: BigDecimal, now: DateTime<Utc>) -> Option<SocialEvent> {
    if state.share_count_24h >= 10 {
        return Some(SocialEvent::Viral);
    }
    if (5..=9).contains(&state.share_count_24h) {
        return Some(SocialEvent::Trending);
    }
    if milestone_crossed(&old_social_value, &state.current_social_value) {
        return Some(SocialEvent::Milestone);
    }
    if now - state.created_at < Duration::days(7) {
        return Some(SocialEvent::New);
    }
    None
}

fn milestone_crossed(before: &BigDecimal, after: &BigDecimal) -> bool {
    let ten = d("10");
    let before_steps = (before / &ten).with_scale(0);
    let after_steps = (after / &ten).with_scale(0);
    after_steps > before_steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_state(palier_threshold: &str, accumulator: &str) -> SocialState {
        SocialState {
            social_accumulator: d(accumulator),
            applied_micro_value: zero(),
            palier_threshold: d(palier_threshold),
            palier_level: 0,
            current_social_value: zero(),
            treasury_pool: zero(),
            redistribution_pool: zero(),
            share_count_24h: 0,
            last_interaction_at: None,
            created_at: Utc::now() - Duration::days(30),
        }
    }

    #[test]
    fn buy_impact_matches_worked_example() {
        // Scenario A: a 1000 FCFA purchase with a 50 FCFA fee carries a
        // transaction_amount of 1050. The palier threshold is
        // deliberately unrelated to that amount — the impact must come
        // from the transaction, never from the threshold.
        let mut state = fresh_state("50000000", "0");
        let outcome = apply_action(
            &mut state,
            ActionType::Buy,
            &d("1050"),
            &ActionMetadata::default(),
            Utc::now(),
        );
        assert_eq!(outcome.impact, d("2.1"));
    }

    #[test]
    fn crossing_a_palier_resets_accumulator_and_bumps_micro_value() {
        // Scenario B: an accumulator sitting at 999,990 against a
        // 1,000,000 threshold, plus a +500 impact, crosses exactly one
        // palier and lands at 490 with a 200 applied_micro_value.
        let mut state = fresh_state("1000000", "999990");
        let metadata = ActionMetadata { override_social_impact: Some(d("500")), ..Default::default() };
        let outcome = apply_action(&mut state, ActionType::Gift, &d("0"), &metadata, Utc::now());
        assert_eq!(outcome.impact, d("500"));
        assert_eq!(outcome.paliers_crossed, 1);
        assert_eq!(state.social_accumulator, d("490"));
        assert_eq!(state.applied_micro_value, d("200"));
    }

    #[test]
    fn override_social_impact_bypasses_the_weight_table() {
        let mut state = fresh_state("1000000", "0");
        let metadata = ActionMetadata { override_social_impact: Some(d("42")), ..Default::default() };
        let outcome = apply_action(&mut state, ActionType::View, &d("999999"), &metadata, Utc::now());
        assert_eq!(outcome.impact, d("42"));
    }

    #[test]
    fn boost_multiplier_scales_the_weighted_impact() {
        let mut state = fresh_state("50000000", "0");
        let metadata = ActionMetadata { boost_multiplier: Some(d("2")), ..Default::default() };
        let outcome = apply_action(&mut state, ActionType::Buy, &d("1050"), &metadata, Utc::now());
        assert_eq!(outcome.impact, d("4.2"));
    }

    #[test]
    fn micro_unit_has_a_floor() {
        assert_eq!(micro_unit(&d("10")), d("0.01"));
        assert_eq!(micro_unit(&d("1000000")), d("200"));
    }

    #[test]
    fn decay_ratio_is_capped_at_half() {
        assert_eq!(decay_ratio(1), zero());
        assert_eq!(decay_ratio(2), d("0.01"));
        assert_eq!(decay_ratio(200), d("0.5"));
    }

    #[test]
    fn sell_reverses_a_palier_without_going_negative() {
        let mut state = fresh_state("1000000", "100");
        state.palier_level = 1;
        state.applied_micro_value = d("200");
        // Force a large negative impact by calling sell repeatedly.
        for _ in 0..20 {
            apply_action(&mut state, ActionType::Sell, &d("1000000"), &ActionMetadata::default(), Utc::now());
        }
        assert!(state.social_accumulator >= zero());
        assert!(state.applied_micro_value >= zero());
        assert!(state.palier_level >= 0);
    }

    #[test]
    fn positive_impact_feeds_both_pools_equally() {
        let mut state = fresh_state("1000", "0");
        apply_action(&mut state, ActionType::Buy, &d("1000"), &ActionMetadata::default(), Utc::now());
        assert_eq!(state.treasury_pool, state.redistribution_pool);
        assert!(state.treasury_pool > zero());
    }

    #[test]
    fn decay_shrinks_micro_value_and_recomputes_palier_level() {
        let mut state = fresh_state("1000000", "0");
        state.applied_micro_value = d("1000");
        state.current_social_value = d("1000");
        state.palier_level = 5;
        state.last_interaction_at = Some(Utc::now() - Duration::days(51));

        apply_action(&mut state, ActionType::View, &d("0"), &ActionMetadata::default(), Utc::now());

        // 51 days inactive caps the decay ratio at 0.5.
        assert_eq!(state.applied_micro_value, d("500.00"));
        assert_eq!(state.current_social_value, d("500.00"));
        let unit = micro_unit(&state.palier_threshold);
        assert_eq!(state.palier_level, round_to_i32(&(&state.applied_micro_value / &unit)));
    }
}
