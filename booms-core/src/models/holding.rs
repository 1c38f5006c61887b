use crate::db::schema::holdings;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// A user's claim on one copy of a BOOM (spec.md §3). A holding in
/// escrow for a pending gift has `transferred_at` set and
/// `is_transferable = false` even though the receiver has not yet
/// taken ownership — see spec.md §3's escrow invariant.
#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = holdings)]
pub struct Holding {
    pub id: i64,
    pub owner_id: i64,
    pub boom_id: i64,
    pub purchase_price: BigDecimal,
    pub fees_paid: BigDecimal,
    pub is_transferable: bool,
    pub is_sold: bool,
    pub receiver_id: Option<i64>,
    pub transferred_at: Option<DateTime<Utc>>,
    pub last_gift_delivered_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub acquired_at: DateTime<Utc>,
}

impl Holding {
    pub fn is_escrowed(&self) -> bool {
        self.transferred_at.is_some() && !self.is_sold
    }

    pub fn is_eligible_for_trade(&self) -> bool {
        self.is_transferable && !self.is_sold && self.deleted_at.is_none()
    }

    /// Anti-spam: a holding may not be re-gifted within 24h of its last
    /// ACCEPTED/DELIVERED gift (spec.md §4.7).
    pub fn is_within_anti_spam_window(&self, now: DateTime<Utc>) -> bool {
        self.last_gift_delivered_at
            .map(|t| now - t < chrono::Duration::hours(24))
            .unwrap_or(false)
    }

    pub fn profit_loss(&self, current_market_value: &BigDecimal) -> BigDecimal {
        current_market_value - &self.purchase_price
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = holdings)]
pub struct NewHolding {
    pub owner_id: i64,
    pub boom_id: i64,
    pub purchase_price: BigDecimal,
    pub fees_paid: BigDecimal,
    pub is_transferable: bool,
    pub is_sold: bool,
    pub receiver_id: Option<i64>,
    pub transferred_at: Option<DateTime<Utc>>,
    pub last_gift_delivered_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub acquired_at: DateTime<Utc>,
}
