use crate::db::schema::treasury;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// The singleton platform purse. `id` is always `1`; the row is seeded
/// at migration time and never created lazily (spec.md §9 Design Note).
#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = treasury)]
pub struct Treasury {
    pub id: i32,
    pub balance: BigDecimal,
    pub total_fees_collected: BigDecimal,
    pub total_transactions: i64,
    pub last_transaction_at: Option<DateTime<Utc>>,
}

pub const TREASURY_SINGLETON_ID: i32 = 1;
