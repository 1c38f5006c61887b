use crate::db::schema::{real_balances, users, virtual_balances};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's lifecycle state. Exactly one applies at a time; a status
/// transition is always logged by the caller (spec.md §3).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::UserStatus"]
pub enum UserStatus {
    Active,
    Review,
    Limited,
    Suspended,
    Banned,
}

impl UserStatus {
    /// Suspended/banned users cannot initiate ledger-mutating pipelines
    /// (spec.md §3 invariant).
    pub fn may_initiate_pipelines(&self) -> bool {
        matches!(self, UserStatus::Active | UserStatus::Review | UserStatus::Limited)
    }
}

/// Fee-reduction tier used by the gift sharing-fee and purchase
/// commission tables (spec.md §4.3).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::LoyaltyTier"]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// The multiplicative reduction applied to a tier-scaled platform
    /// fee: the gift sharing fee and the BOOM purchase commission.
    pub fn fee_reduction(&self) -> BigDecimal {
        use std::str::FromStr;
        let literal = match self {
            LoyaltyTier::Bronze => "1.0",
            LoyaltyTier::Silver => "0.9",
            LoyaltyTier::Gold => "0.85",
            LoyaltyTier::Platinum => "0.8",
        };
        BigDecimal::from_str(literal).unwrap()
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i64,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub full_name: String,
    pub status: UserStatus,
    pub suspended_until: Option<DateTime<Utc>>,
    pub banned_at: Option<DateTime<Utc>>,
    pub is_admin: bool,
    pub loyalty_tier: LoyaltyTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn assert_can_trade(&self) -> crate::errors::BoomsResult<()> {
        match self.status {
            UserStatus::Banned => Err(crate::errors::BoomsError::UserBanned),
            UserStatus::Suspended => Err(crate::errors::BoomsError::UserSuspended),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = real_balances)]
#[diesel(primary_key(user_id))]
pub struct RealBalance {
    pub user_id: i64,
    pub available: BigDecimal,
    pub locked: BigDecimal,
    pub updated_at: DateTime<Utc>,
}

impl RealBalance {
    pub fn total(&self) -> BigDecimal {
        &self.available + &self.locked
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = virtual_balances)]
#[diesel(primary_key(user_id))]
pub struct VirtualBalance {
    pub user_id: i64,
    pub balance: BigDecimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub full_name: String,
    pub status: UserStatus,
    pub is_admin: bool,
    pub loyalty_tier: LoyaltyTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
