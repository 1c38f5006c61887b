use crate::error::ApiError;
use crate::{auth::AuthUser, state::AppState};
use axum::extract::{Path, State};
use axum::Json;
use bigdecimal::BigDecimal;
use booms_core::db::schema::payment_transactions;
use booms_core::models::{NewPaymentTransaction, PaymentMethod, PaymentStatus};
use booms_core::webhooks::{self, ProviderCallback};
use booms_core::BoomsError;
use booms_providers::providers::{MtnMomoProvider, OrangeMoneyProvider, StripeProvider, WaveProvider};
use booms_providers::{DepositRequest, PaymentProvider};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

fn provider_for(state: &AppState, name: &str) -> Result<Box<dyn PaymentProvider>, ApiError> {
    let secrets = &state.secrets;
    let provider: Box<dyn PaymentProvider> = match name {
        "wave" => Box::new(WaveProvider::new(secrets.wave_api_key.clone(), secrets.wave_webhook_secret.clone())),
        "orange_money" => Box::new(OrangeMoneyProvider::new(
            secrets.orange_api_key.clone(),
            secrets.orange_business_phone.clone(),
            secrets.orange_webhook_secret.clone(),
        )),
        "mtn_momo" => Box::new(MtnMomoProvider::new(
            secrets.mtn_momo_api_key.clone(),
            secrets.mtn_momo_subscription_key.clone(),
            secrets.mtn_momo_webhook_secret.clone(),
        )),
        "stripe" => {
            Box::new(StripeProvider::new(secrets.stripe_secret_key.clone(), secrets.stripe_webhook_secret.clone()))
        }
        other => return Err(BoomsError::Validation(format!("unknown provider: {other}")).into()),
    };
    Ok(provider)
}

fn method_for(name: &str) -> Option<PaymentMethod> {
    match name {
        "wave" => Some(PaymentMethod::Wave),
        "orange_money" => Some(PaymentMethod::OrangeMoney),
        "mtn_momo" => Some(PaymentMethod::MtnMomo),
        "stripe" => Some(PaymentMethod::Stripe),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct InitiateDepositRequest {
    pub provider: String,
    pub amount: BigDecimal,
    pub payer_phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InitiateDepositResponse {
    pub transaction_id: String,
    pub confirmation_hint: Option<String>,
}

pub async fn initiate_deposit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<InitiateDepositRequest>,
) -> Result<Json<InitiateDepositResponse>, ApiError> {
    state.rate_limiters.check_deposit(user_id)?;
    let provider = provider_for(&state, &request.provider)?;
    let now = Utc::now();
    let transaction_id = format!("BOOMS_DEPOSIT_{}_{}", user_id, now.timestamp_millis());

    let mut conn = state.conn().await?;
    let new_tx = NewPaymentTransaction {
        id: transaction_id.clone(),
        user_id,
        kind: "deposit".to_string(),
        amount: request.amount.clone(),
        fees: BigDecimal::from(0),
        net_amount: request.amount.clone(),
        status: PaymentStatus::Pending,
        provider: method_for(&request.provider),
        provider_reference: None,
        description: Some("deposit initiation".to_string()),
        boom_id: None,
        holding_id: None,
        created_at: now,
    };
    diesel::insert_into(payment_transactions::table)
        .values(&new_tx)
        .execute(&mut conn)
        .await
        .map_err(BoomsError::from)?;

    let handle = provider
        .initiate_deposit(DepositRequest {
            user_id,
            amount: request.amount,
            reference: transaction_id.clone(),
            payer_phone: request.payer_phone,
        })
        .await
        .map_err(BoomsError::from)?;

    diesel::update(payment_transactions::table.filter(payment_transactions::id.eq(&transaction_id)))
        .set(payment_transactions::provider_reference.eq(&handle.provider_reference))
        .execute(&mut conn)
        .await
        .map_err(BoomsError::from)?;

    Ok(Json(InitiateDepositResponse { transaction_id, confirmation_hint: handle.confirmation_hint }))
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub transaction_id: String,
    pub provider_reference: String,
    pub succeeded: bool,
    pub settled_amount: BigDecimal,
}

pub async fn webhook(
    State(state): State<AppState>,
    Path(provider_name): Path<String>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<&'static str>, ApiError> {
    state.rate_limiters.check_webhook(&provider_name)?;
    let provider = provider_for(&state, &provider_name)?;
    let signature = headers
        .get("X-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(BoomsError::Forbidden)?;
    provider.verify_webhook(&body, signature).map_err(BoomsError::from)?;

    let payload: WebhookPayload =
        serde_json::from_slice(&body).map_err(|e| BoomsError::Validation(e.to_string()))?;

    let mut conn = state.conn().await?;
    let callback = ProviderCallback {
        transaction_id: payload.transaction_id,
        provider_reference: payload.provider_reference,
        succeeded: payload.succeeded,
        settled_amount: payload.settled_amount,
    };
    let outcome = conn
        .transaction::<_, BoomsError, _>(|conn| Box::pin(async move { webhooks::reconcile(conn, &callback).await }))
        .await
        .map_err(ApiError)?;

    booms_metrics::record_webhook_reconciliation(&provider_name, &format!("{outcome:?}"));
    Ok(Json("ok"))
}
