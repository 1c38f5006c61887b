//! The four payment-rail adapters named in spec.md §6. Each wraps a
//! `reqwest::Client`, its base URL, and the credentials read from
//! `booms_core::config::ProviderSecrets`.

use crate::signature::{verify, SignatureError};
use crate::{DepositHandle, DepositRequest, PaymentProvider, ProviderError};
use async_trait::async_trait;
use serde_json::json;

impl From<SignatureError> for ProviderError {
    fn from(err: SignatureError) -> Self {
        ProviderError::UnexpectedResponse(err.to_string())
    }
}

pub struct WaveProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    webhook_secret: Option<String>,
}

impl WaveProvider {
    pub fn new(api_key: Option<String>, webhook_secret: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), api_key, webhook_secret }
    }
}

#[async_trait]
impl PaymentProvider for WaveProvider {
    fn name(&self) -> &'static str {
        "wave"
    }

    async fn initiate_deposit(&self, request: DepositRequest) -> Result<DepositHandle, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| ProviderError::NotConfigured("wave".into()))?;
        let response = self
            .client
            .post("https://api.wave.com/v1/checkout/sessions")
            .bearer_auth(api_key)
            .json(&json!({
                "amount": request.amount.to_string(),
                "currency": "XOF",
                "client_reference": request.reference,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let body: serde_json::Value =
            response.json().await.map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;
        let provider_reference = body["id"]
            .as_str()
            .ok_or_else(|| ProviderError::UnexpectedResponse("missing id".into()))?
            .to_string();
        let confirmation_hint = body["wave_launch_url"].as_str().map(str::to_string);
        Ok(DepositHandle { provider_reference, confirmation_hint })
    }

    fn verify_webhook(&self, payload: &[u8], signature_header: &str) -> Result<(), ProviderError> {
        let secret = self.webhook_secret.as_ref().ok_or_else(|| ProviderError::NotConfigured("wave".into()))?;
        Ok(verify(secret, payload, signature_header)?)
    }
}

pub struct OrangeMoneyProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    business_phone: Option<String>,
    webhook_secret: Option<String>,
}

impl OrangeMoneyProvider {
    pub fn new(api_key: Option<String>, business_phone: Option<String>, webhook_secret: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), api_key, business_phone, webhook_secret }
    }
}

#[async_trait]
impl PaymentProvider for OrangeMoneyProvider {
    fn name(&self) -> &'static str {
        "orange_money"
    }

    async fn initiate_deposit(&self, request: DepositRequest) -> Result<DepositHandle, ProviderError> {
        let api_key =
            self.api_key.as_ref().ok_or_else(|| ProviderError::NotConfigured("orange_money".into()))?;
        let merchant = self
            .business_phone
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured("orange_money".into()))?;
        let response = self
            .client
            .post("https://api.orange.com/orange-money-webpay/ml/v1/webpayment")
            .bearer_auth(api_key)
            .json(&json!({
                "merchant_key": merchant,
                "amount": request.amount.to_string(),
                "order_id": request.reference,
            }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let body: serde_json::Value =
            response.json().await.map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;
        let provider_reference = body["pay_token"]
            .as_str()
            .ok_or_else(|| ProviderError::UnexpectedResponse("missing pay_token".into()))?
            .to_string();
        let confirmation_hint = body["payment_url"].as_str().map(str::to_string);
        Ok(DepositHandle { provider_reference, confirmation_hint })
    }

    fn verify_webhook(&self, payload: &[u8], signature_header: &str) -> Result<(), ProviderError> {
        let secret =
            self.webhook_secret.as_ref().ok_or_else(|| ProviderError::NotConfigured("orange_money".into()))?;
        Ok(verify(secret, payload, signature_header)?)
    }
}

pub struct MtnMomoProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    subscription_key: Option<String>,
    webhook_secret: Option<String>,
}

impl MtnMomoProvider {
    pub fn new(api_key: Option<String>, subscription_key: Option<String>, webhook_secret: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), api_key, subscription_key, webhook_secret }
    }
}

#[async_trait]
impl PaymentProvider for MtnMomoProvider {
    fn name(&self) -> &'static str {
        "mtn_momo"
    }

    async fn initiate_deposit(&self, request: DepositRequest) -> Result<DepositHandle, ProviderError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| ProviderError::NotConfigured("mtn_momo".into()))?;
        let subscription_key = self
            .subscription_key
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured("mtn_momo".into()))?;
        let response = self
            .client
            .post("https://sandbox.momodeveloper.mtn.com/collection/v1_0/requesttopay")
            .bearer_auth(api_key)
            .header("Ocp-Apim-Subscription-Key", subscription_key)
            .json(&json!({
                "amount": request.amount.to_string(),
                "currency": "XOF",
                "externalId": request.reference,
                "payer": { "partyIdType": "MSISDN", "partyId": request.payer_phone },
            }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let provider_reference = response
            .headers()
            .get("X-Reference-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ProviderError::UnexpectedResponse("missing X-Reference-Id".into()))?
            .to_string();
        Ok(DepositHandle { provider_reference, confirmation_hint: None })
    }

    fn verify_webhook(&self, payload: &[u8], signature_header: &str) -> Result<(), ProviderError> {
        let secret = self.webhook_secret.as_ref().ok_or_else(|| ProviderError::NotConfigured("mtn_momo".into()))?;
        Ok(verify(secret, payload, signature_header)?)
    }
}

pub struct StripeProvider {
    client: reqwest::Client,
    secret_key: Option<String>,
    webhook_secret: Option<String>,
}

impl StripeProvider {
    pub fn new(secret_key: Option<String>, webhook_secret: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), secret_key, webhook_secret }
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    fn name(&self) -> &'static str {
        "stripe"
    }

    async fn initiate_deposit(&self, request: DepositRequest) -> Result<DepositHandle, ProviderError> {
        let secret_key = self.secret_key.as_ref().ok_or_else(|| ProviderError::NotConfigured("stripe".into()))?;
        let response = self
            .client
            .post("https://api.stripe.com/v1/payment_intents")
            .bearer_auth(secret_key)
            .form(&[
                ("amount", request.amount.to_string()),
                ("currency", "xof".to_string()),
                ("metadata[reference]", request.reference.clone()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let body: serde_json::Value =
            response.json().await.map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;
        let provider_reference = body["id"]
            .as_str()
            .ok_or_else(|| ProviderError::UnexpectedResponse("missing id".into()))?
            .to_string();
        let confirmation_hint = body["client_secret"].as_str().map(str::to_string);
        Ok(DepositHandle { provider_reference, confirmation_hint })
    }

    fn verify_webhook(&self, payload: &[u8], signature_header: &str) -> Result<(), ProviderError> {
        let secret = self.webhook_secret.as_ref().ok_or_else(|| ProviderError::NotConfigured("stripe".into()))?;
        Ok(verify(secret, payload, signature_header)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn request() -> DepositRequest {
        DepositRequest {
            user_id: 1,
            amount: BigDecimal::from(1000),
            reference: "BOOMS-DEPOSIT-1".to_string(),
            payer_phone: None,
        }
    }

    #[tokio::test]
    async fn unconfigured_wave_rejects_deposit_without_a_network_call() {
        let provider = WaveProvider::new(None, None);
        let err = provider.initiate_deposit(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(name) if name == "wave"));
    }

    #[test]
    fn unconfigured_wave_rejects_webhook_verification() {
        let provider = WaveProvider::new(None, None);
        assert!(matches!(
            provider.verify_webhook(b"{}", "sig"),
            Err(ProviderError::NotConfigured(name)) if name == "wave"
        ));
    }

    #[tokio::test]
    async fn unconfigured_mtn_momo_rejects_deposit() {
        let provider = MtnMomoProvider::new(None, None, None);
        let err = provider.initiate_deposit(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(name) if name == "mtn_momo"));
    }

    #[test]
    fn unconfigured_stripe_rejects_webhook_verification() {
        let provider = StripeProvider::new(None, None);
        assert!(matches!(provider.verify_webhook(b"{}", "sig"), Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn configured_orange_money_rejects_bad_signature() {
        let provider = OrangeMoneyProvider::new(Some("key".into()), Some("phone".into()), Some("whsec".into()));
        assert!(provider.verify_webhook(b"{}", "not-a-valid-signature").is_err());
    }
}
