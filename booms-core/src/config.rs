//! Runtime configuration, layered the way `server-framework` expects:
//! a YAML file for topology/tunables, with secrets (the
//! environment-configured keys of spec.md §6) read from the
//! environment and never persisted to the file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoomsConfig {
    pub database_url_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
}

fn default_base_url() -> String {
    "https://api.booms.app".to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_access_token_minutes() -> i64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_palier_threshold")]
    pub default_palier_threshold: String,
    #[serde(default = "default_max_deadlock_retries")]
    pub max_deadlock_retries: u32,
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_backoff_ms: u64,
}

fn default_palier_threshold() -> String {
    "1000000".to_string()
}

fn default_max_deadlock_retries() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    100
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_palier_threshold: default_palier_threshold(),
            max_deadlock_retries: default_max_deadlock_retries(),
            retry_base_backoff_ms: default_retry_base_ms(),
        }
    }
}

impl LedgerConfig {
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_base_backoff_ms * attempt as u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_deposit_rpm")]
    pub deposit_initiation_per_minute: u32,
    #[serde(default = "default_withdrawal_rpm")]
    pub withdrawal_initiation_per_minute: u32,
    #[serde(default = "default_validation_rpm")]
    pub validation_per_minute: u32,
    #[serde(default = "default_webhook_rpm")]
    pub webhook_per_minute: u32,
    #[serde(default = "default_stats_rpm")]
    pub stats_per_minute: u32,
}

fn default_deposit_rpm() -> u32 {
    5
}
fn default_withdrawal_rpm() -> u32 {
    3
}
fn default_validation_rpm() -> u32 {
    10
}
fn default_webhook_rpm() -> u32 {
    60
}
fn default_stats_rpm() -> u32 {
    30
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            deposit_initiation_per_minute: default_deposit_rpm(),
            withdrawal_initiation_per_minute: default_withdrawal_rpm(),
            validation_per_minute: default_validation_rpm(),
            webhook_per_minute: default_webhook_rpm(),
            stats_per_minute: default_stats_rpm(),
        }
    }
}

impl BoomsConfig {
    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let config: BoomsConfig = serde_yaml::from_str(raw)?;
        Ok(config)
    }

    pub fn database_url(&self) -> anyhow::Result<String> {
        std::env::var(&self.database_url_env)
            .map_err(|_| anyhow::anyhow!("{} is not set", self.database_url_env))
    }
}

/// Recognized provider secrets (spec.md §6). Each is optional; absence
/// disables that provider rather than erroring at startup.
#[derive(Debug, Clone, Default)]
pub struct ProviderSecrets {
    pub wave_api_key: Option<String>,
    pub wave_merchant_key: Option<String>,
    pub wave_business_account: Option<String>,
    pub wave_webhook_secret: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_publishable_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub orange_api_key: Option<String>,
    pub orange_api_secret: Option<String>,
    pub orange_business_phone: Option<String>,
    pub orange_webhook_secret: Option<String>,
    pub mtn_momo_api_key: Option<String>,
    pub mtn_momo_api_secret: Option<String>,
    pub mtn_momo_subscription_key: Option<String>,
    pub mtn_momo_webhook_secret: Option<String>,
    pub secret_key: Option<String>,
}

impl ProviderSecrets {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            wave_api_key: var("WAVE_API_KEY"),
            wave_merchant_key: var("WAVE_MERCHANT_KEY"),
            wave_business_account: var("WAVE_BUSINESS_ACCOUNT"),
            wave_webhook_secret: var("WAVE_WEBHOOK_SECRET"),
            stripe_secret_key: var("STRIPE_SECRET_KEY"),
            stripe_publishable_key: var("STRIPE_PUBLISHABLE_KEY"),
            stripe_webhook_secret: var("STRIPE_WEBHOOK_SECRET"),
            orange_api_key: var("ORANGE_API_KEY"),
            orange_api_secret: var("ORANGE_API_SECRET"),
            orange_business_phone: var("ORANGE_BUSINESS_PHONE"),
            orange_webhook_secret: var("ORANGE_WEBHOOK_SECRET"),
            mtn_momo_api_key: var("MTN_MOMO_API_KEY"),
            mtn_momo_api_secret: var("MTN_MOMO_API_SECRET"),
            mtn_momo_subscription_key: var("MTN_MOMO_SUBSCRIPTION_KEY"),
            mtn_momo_webhook_secret: var("MTN_MOMO_WEBHOOK_SECRET"),
            secret_key: var("SECRET_KEY"),
        }
    }
}
