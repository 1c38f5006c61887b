//! Payment-provider adapters (spec.md §4.9/§6). Each provider is a
//! thin `PaymentProvider` implementation over that rail's HTTP API; the
//! shared HMAC-SHA256 signature scheme used to authenticate inbound
//! webhooks lives in `signature`.

pub mod providers;
pub mod signature;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("provider request failed: {0}")]
    RequestFailed(String),
    #[error("provider returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<ProviderError> for booms_core::BoomsError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(p) => booms_core::BoomsError::ProviderUnconfigured(p),
            other => booms_core::BoomsError::ProviderError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub user_id: i64,
    pub amount: BigDecimal,
    pub reference: String,
    pub payer_phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DepositHandle {
    /// The provider's own identifier for this transaction, used to
    /// correlate the eventual webhook callback.
    pub provider_reference: String,
    /// A URL or USSD code the client should present to the payer, when
    /// the rail requires an out-of-band confirmation step.
    pub confirmation_hint: Option<String>,
}

/// Common surface every payment rail exposes. Implementations are
/// intentionally thin: validation and fee computation happen in
/// `booms-core`, this trait only talks to the wire.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn initiate_deposit(&self, request: DepositRequest) -> Result<DepositHandle, ProviderError>;

    /// Verifies a webhook payload's signature using this provider's
    /// configured secret. Returns `Ok(())` if authentic.
    fn verify_webhook(&self, payload: &[u8], signature_header: &str) -> Result<(), ProviderError>;
}
