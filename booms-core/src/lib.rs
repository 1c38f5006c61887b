//! The BOOMS transactional economic engine.
//!
//! This crate owns the ledger (real/virtual balances and the platform
//! treasury), the social-value engine that mutates a BOOM's quoted
//! price as users act on it, and the ACID pipelines that coordinate
//! both under the locking discipline described in `db::locking`.
//!
//! Nothing in this crate performs HTTP I/O or talks to a payment
//! provider directly — those are the job of `booms-providers` and the
//! `booms-api` binary. Pipelines accept an already-open database
//! transaction and return a typed result record.

pub mod config;
pub mod db;
pub mod errors;
pub mod fees;
pub mod interactions;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod money;
pub mod pipelines;
pub mod retry;
pub mod social;
pub mod webhooks;

pub use errors::{BoomsError, BoomsResult};
