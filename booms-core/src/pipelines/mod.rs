//! Transaction pipelines (C5-C8 plus the peer-to-peer transfer path).
//! Each function here assumes it is already running inside an open
//! `AsyncPgConnection` transaction — callers combine them with
//! `retry::with_retry` and `conn.transaction(..)` at the call site so
//! the retry boundary wraps the whole attempt, not just one query.

pub mod gift;
pub mod purchase;
pub mod sale;
pub mod transfer;
pub mod withdrawal;

pub use gift::{accept_gift, decline_gift, send_gift, GiftAcceptOutcome, GiftSendOutcome};
pub use purchase::{purchase_boom, PurchaseOutcome};
pub use sale::{sell_boom, SaleOutcome};
pub use transfer::{transfer_holding, TransferOutcome};
pub use withdrawal::{request_withdrawal, WithdrawalOutcome};
