use crate::db::schema::{payment_transactions, withdrawal_requests};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::PaymentMethod"]
pub enum PaymentMethod {
    Wave,
    Stripe,
    OrangeMoney,
    MtnMomo,
    System,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::PaymentStatus"]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// Real-money transaction record (spec.md §4.9/§6). `id` is the
/// provider-assigned or platform-generated idempotency key, persisted
/// before any external call is made (spec.md §5 Idempotence keys).
#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = payment_transactions)]
pub struct PaymentTransaction {
    pub id: String,
    pub user_id: i64,
    pub kind: String,
    pub amount: BigDecimal,
    pub fees: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: PaymentStatus,
    pub provider: Option<PaymentMethod>,
    pub provider_reference: Option<String>,
    pub description: Option<String>,
    pub boom_id: Option<i64>,
    pub holding_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_transactions)]
pub struct NewPaymentTransaction {
    pub id: String,
    pub user_id: i64,
    pub kind: String,
    pub amount: BigDecimal,
    pub fees: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: PaymentStatus,
    pub provider: Option<PaymentMethod>,
    pub provider_reference: Option<String>,
    pub description: Option<String>,
    pub boom_id: Option<i64>,
    pub holding_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Append-only withdrawal audit trail (SPEC_FULL supplement, grounded
/// in the original `BomWithdrawalRequest` model). Always written by
/// the withdrawal pipeline even though spec.md §4.8 only narrates the
/// happy path.
#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = withdrawal_requests)]
pub struct WithdrawalRequest {
    pub id: i64,
    pub user_id: i64,
    pub holding_id: i64,
    pub requested_amount: BigDecimal,
    pub fees: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = withdrawal_requests)]
pub struct NewWithdrawalRequest {
    pub user_id: i64,
    pub holding_id: i64,
    pub requested_amount: BigDecimal,
    pub fees: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
