//! Event envelope broadcast to WebSocket subscribers (C10). Every
//! event carries a monotonic sequence number scoped to the process so a
//! reconnecting client can detect a gap and ask for a resync.

use bigdecimal::BigDecimal;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoomsEventBody {
    BalanceUpdate { user_id: i64, real_available: BigDecimal, virtual_balance: BigDecimal },
    SocialValueUpdate { boom_id: i64, market_value: BigDecimal, applied_micro_value: BigDecimal },
    SocialEvent { boom_id: i64, kind: String },
    UserNotification { user_id: i64, title: String, body: String },
    TreasuryUpdate { balance: BigDecimal, total_fees_collected: BigDecimal },
}

#[derive(Debug, Clone, Serialize)]
pub struct BoomsEvent {
    pub sequence: u64,
    pub body: BoomsEventBody,
}

impl BoomsEvent {
    pub fn new(body: BoomsEventBody) -> Self {
        Self { sequence: next_sequence(), body }
    }
}

/// The subscription scope a client can ask for: everything belonging
/// to one user, everything about one BOOM, or the platform-wide
/// treasury feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    User(i64),
    Boom(i64),
    Treasury,
}
