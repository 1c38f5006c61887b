use crate::db::schema::booms;
use crate::money::round_value;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A social event surfaced on a BOOM (spec.md §4.2). Detected
/// post-mutation and auto-expired by the sweeper.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::SocialEventKind"]
pub enum SocialEventKind {
    Viral,
    Trending,
    New,
    Milestone,
}

impl SocialEventKind {
    pub fn duration(&self) -> chrono::Duration {
        match self {
            SocialEventKind::Viral => chrono::Duration::hours(24),
            SocialEventKind::Trending => chrono::Duration::hours(12),
            SocialEventKind::New => chrono::Duration::days(7),
            SocialEventKind::Milestone => chrono::Duration::days(1),
        }
    }
}

/// A tradable collectible (spec.md §3). Pricing is decomposed into an
/// immutable `base_price` plus the `applied_micro_value` the
/// social-value engine has unlocked by crossing palier thresholds.
#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = booms)]
pub struct Boom {
    pub id: i64,
    pub token_id: String,
    pub base_price: BigDecimal,
    pub current_social_value: BigDecimal,
    pub applied_micro_value: BigDecimal,
    pub social_accumulator: BigDecimal,
    pub palier_threshold: BigDecimal,
    pub palier_level: i32,
    pub buy_count: i32,
    pub sell_count: i32,
    pub share_count: i32,
    pub share_count_24h: i32,
    pub interaction_count: i32,
    pub unique_holders: i32,
    pub owner_id: Option<i64>,
    pub max_editions: Option<i32>,
    pub current_edition: i32,
    pub available_editions: Option<i32>,
    pub active_event: Option<SocialEventKind>,
    pub event_expires_at: Option<DateTime<Utc>>,
    pub treasury_pool: BigDecimal,
    pub redistribution_pool: BigDecimal,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Boom {
    /// The quoted market value shown to clients: `base_price + applied_micro_value`,
    /// rounded to 2 decimals (spec.md §3/§8 invariant 3).
    pub fn market_value(&self) -> BigDecimal {
        round_value(&(&self.base_price + &self.applied_micro_value))
    }

    /// The micro-unit size for this BOOM's current palier threshold:
    /// `max(0.01, palier_threshold * 0.0002)`.
    pub fn micro_unit(&self) -> BigDecimal {
        crate::social::micro_unit(&self.palier_threshold)
    }

    pub fn is_single_edition(&self) -> bool {
        self.max_editions.map(|m| m <= 1).unwrap_or(true)
    }

    pub fn is_multi_edition(&self) -> bool {
        !self.is_single_edition()
    }

    pub fn has_available_stock(&self, quantity: i32) -> bool {
        if self.is_single_edition() {
            self.owner_id.is_none() && quantity == 1
        } else {
            self.current_edition + quantity <= self.max_editions.unwrap_or(i32::MAX)
        }
    }
}
