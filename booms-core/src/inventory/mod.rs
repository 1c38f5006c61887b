//! Holding/ownership bookkeeping (C3): edition accounting for
//! multi-edition BOOMs and the ownership-transition checks every
//! trading pipeline must perform before moving a `Holding` between
//! users.

use crate::errors::{BoomsError, BoomsResult};
use crate::models::Holding;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

/// The subset of a BOOM's fields edition accounting needs, decoupled
/// from the diesel model so it can be unit tested without a pool.
#[derive(Debug, Clone)]
pub struct EditionState {
    pub max_editions: Option<i32>,
    pub current_edition: i32,
    pub available_editions: Option<i32>,
}

impl EditionState {
    pub fn is_single_edition(&self) -> bool {
        self.max_editions.map(|m| m <= 1).unwrap_or(true)
    }
}

/// Mints the next edition, decrementing the available pool for
/// multi-edition BOOMs. Returns the edition number assigned to the
/// newly minted holding.
pub fn mint_edition(state: &mut EditionState) -> BoomsResult<i32> {
    if state.is_single_edition() {
        if state.current_edition > 0 {
            return Err(BoomsError::StockExhausted);
        }
        state.current_edition = 1;
        state.available_editions = Some(0);
        return Ok(1);
    }
    let available = state.available_editions.unwrap_or(0);
    if available <= 0 {
        return Err(BoomsError::StockExhausted);
    }
    state.current_edition += 1;
    state.available_editions = Some(available - 1);
    Ok(state.current_edition)
}

/// Returns a unit to the available pool, e.g. when a purchase's
/// enclosing transaction rolls back after a provisional mint.
pub fn release_edition(state: &mut EditionState) {
    if state.is_single_edition() {
        state.current_edition = 0;
        state.available_editions = None;
        return;
    }
    let available = state.available_editions.unwrap_or(0);
    state.available_editions = Some(available + 1);
}

/// Asserts `holding` belongs to `user_id`, per the ownership check every
/// sale/transfer/gift/withdrawal pipeline performs up front.
pub fn assert_owned(holding: &Holding, user_id: i64) -> BoomsResult<()> {
    if holding.owner_id != user_id {
        return Err(BoomsError::HoldingNotOwned);
    }
    Ok(())
}

/// Asserts `holding` is free to change hands: not already sold, not
/// soft-deleted, not currently escrowed for another pending gift, and
/// flagged transferable.
pub fn assert_tradeable(holding: &Holding) -> BoomsResult<()> {
    if holding.is_sold || holding.deleted_at.is_some() {
        return Err(BoomsError::HoldingNotTransferable);
    }
    if !holding.is_transferable {
        return Err(BoomsError::HoldingNotTransferable);
    }
    if holding.is_escrowed() {
        return Err(BoomsError::HoldingNotTransferable);
    }
    Ok(())
}

/// The gift anti-spam check (spec.md §4.7): a holding delivered by gift
/// in the last 24h may not immediately be re-gifted.
pub fn assert_not_recently_gifted(holding: &Holding, now: DateTime<Utc>) -> BoomsResult<()> {
    if holding.is_within_anti_spam_window(now) {
        return Err(BoomsError::GiftDuplicateRecent);
    }
    Ok(())
}

pub fn profit_loss(holding: &Holding, current_market_value: &BigDecimal) -> BigDecimal {
    holding.profit_loss(current_market_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_edition_mints_exactly_once() {
        let mut state = EditionState { max_editions: Some(1), current_edition: 0, available_editions: Some(1) };
        assert_eq!(mint_edition(&mut state).unwrap(), 1);
        assert!(mint_edition(&mut state).is_err());
    }

    #[test]
    fn multi_edition_tracks_available_pool() {
        let mut state = EditionState { max_editions: Some(3), current_edition: 0, available_editions: Some(3) };
        assert_eq!(mint_edition(&mut state).unwrap(), 1);
        assert_eq!(mint_edition(&mut state).unwrap(), 2);
        assert_eq!(state.available_editions, Some(1));
        release_edition(&mut state);
        assert_eq!(state.available_editions, Some(2));
    }
}
