pub mod auth;
pub mod gift;
pub mod interactions;
pub mod market;
pub mod payments;
pub mod wallet;
pub mod withdrawal;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/wallet/balance", get(wallet::dual_balance))
        .route("/wallet/cash-balance", get(wallet::cash_balance))
        .route("/wallet/dual-balance", get(wallet::dual_balance))
        .route("/purchase/bom", post(market::purchase))
        .route("/market/buy", post(market::purchase))
        .route("/market/sell", post(market::sell))
        .route("/market/boom/:boom_id/stats", get(market::stats))
        .route("/gift/send", post(gift::send))
        .route("/gift/accept", post(gift::accept))
        .route("/gift/decline", post(gift::decline))
        .route("/gift/inbox", get(gift::inbox))
        .route("/withdrawal/bom/validate", post(withdrawal::validate))
        .route("/bom/execute", post(withdrawal::execute))
        .route("/payments/deposit/initiate", post(payments::initiate_deposit))
        .route("/payments/:provider/webhook", post(payments::webhook))
        .route("/interactions", post(interactions::record))
        .with_state(state)
}
