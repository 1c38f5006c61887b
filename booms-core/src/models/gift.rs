use crate::db::schema::gifts;
use crate::errors::{BoomsError, BoomsResult};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Gift lifecycle status. New gifts always use the CREATED/PAID/
/// DELIVERED/FAILED flow; SENT/ACCEPTED/DECLINED/EXPIRED are retained
/// only for unfinished historical (legacy) records (spec.md §4.7). A
/// given gift uses exactly one flow for its whole life.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::GiftStatus"]
pub enum GiftStatus {
    Created,
    Paid,
    Delivered,
    Failed,
    Expired,
    Sent,
    Accepted,
    Declined,
}

impl GiftStatus {
    pub fn is_new_flow(&self) -> bool {
        matches!(
            self,
            GiftStatus::Created | GiftStatus::Paid | GiftStatus::Delivered | GiftStatus::Failed
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GiftStatus::Delivered
                | GiftStatus::Failed
                | GiftStatus::Expired
                | GiftStatus::Accepted
                | GiftStatus::Declined
        )
    }

    /// Validates a transition per spec.md §4.7's allowed-transition tables.
    pub fn validate_transition(self, to: GiftStatus) -> BoomsResult<()> {
        let allowed: &[GiftStatus] = match self {
            GiftStatus::Created => &[GiftStatus::Paid, GiftStatus::Failed],
            GiftStatus::Paid => &[GiftStatus::Delivered, GiftStatus::Failed, GiftStatus::Expired],
            GiftStatus::Sent => &[GiftStatus::Accepted, GiftStatus::Declined, GiftStatus::Expired],
            _ => &[],
        };
        if allowed.contains(&to) {
            Ok(())
        } else {
            Err(BoomsError::GiftInvalidTransition {
                from: format!("{self:?}"),
                to: format!("{to:?}"),
            })
        }
    }
}

/// Two-phase transfer record (spec.md §3). `transaction_reference`
/// follows the `GIFT-<unix_ms>-<12-hex-uppercase>` format (spec.md §6).
#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = gifts)]
pub struct Gift {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub holding_id: i64,
    pub message: Option<String>,
    pub status: GiftStatus,
    pub gross_amount: BigDecimal,
    pub fee_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub transaction_reference: String,
    pub wallet_transaction_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gifts)]
pub struct NewGift {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub holding_id: i64,
    pub message: Option<String>,
    pub status: GiftStatus,
    pub gross_amount: BigDecimal,
    pub fee_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub transaction_reference: String,
    pub wallet_transaction_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Generates a unique `GIFT-<unix_ms>-<12 hex uppercase>` reference
/// (spec.md §6). `ms` and `random_hex12` are passed in rather than
/// sourced from ambient clock/RNG so the function stays pure and
/// testable; callers supply `Utc::now()`/a fresh `rand` draw.
pub fn generate_transaction_reference(unix_ms: i64, random_hex12: &str) -> String {
    debug_assert_eq!(random_hex12.len(), 12);
    format!("GIFT-{unix_ms}-{}", random_hex12.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_expected_shape() {
        let reference = generate_transaction_reference(1_704_067_200_000, "abc123def456");
        assert_eq!(reference, "GIFT-1704067200000-ABC123DEF456");
    }

    #[test]
    fn new_flow_transitions_are_restricted() {
        assert!(GiftStatus::Created.validate_transition(GiftStatus::Paid).is_ok());
        assert!(GiftStatus::Created.validate_transition(GiftStatus::Delivered).is_err());
        assert!(GiftStatus::Paid.validate_transition(GiftStatus::Delivered).is_ok());
        assert!(GiftStatus::Paid.validate_transition(GiftStatus::Created).is_err());
    }

    #[test]
    fn terminal_states_accept_nothing() {
        assert!(GiftStatus::Delivered.validate_transition(GiftStatus::Failed).is_err());
    }
}
