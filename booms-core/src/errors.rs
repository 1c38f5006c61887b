use thiserror::Error;

/// The taxonomy of structured error codes a pipeline or reconciler can
/// surface to a caller. Every variant maps 1:1 to a code in the HTTP
/// surface's error envelope; the binary is responsible for the status
/// code mapping (4xx for validation/contention, 5xx for integrity).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoomsError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("insufficient real funds: needed {needed}, available {available}")]
    InsufficientRealFunds { needed: String, available: String },

    #[error("insufficient virtual funds: needed {needed}, available {available}")]
    InsufficientVirtualFunds { needed: String, available: String },

    #[error("boom unavailable")]
    BoomUnavailable,

    #[error("stock exhausted")]
    StockExhausted,

    #[error("holding not owned")]
    HoldingNotOwned,

    #[error("holding not transferable")]
    HoldingNotTransferable,

    #[error("gift not found")]
    GiftNotFound,

    #[error("gift expired")]
    GiftExpired,

    #[error("invalid gift transition: {from} -> {to}")]
    GiftInvalidTransition { from: String, to: String },

    #[error("duplicate gift within anti-spam window")]
    GiftDuplicateRecent,

    #[error("user not found")]
    UserNotFound,

    #[error("user suspended")]
    UserSuspended,

    #[error("user banned")]
    UserBanned,

    #[error("forbidden")]
    Forbidden,

    #[error("payment provider not configured: {0}")]
    ProviderUnconfigured(String),

    #[error("payment provider error: {0}")]
    ProviderError(String),

    #[error("transaction contended after retries")]
    TransientContended,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("integrity error: {0}")]
    Integrity(String),
}

impl BoomsError {
    /// Whether this error represents a transient condition worth
    /// retrying at the pipeline-invocation layer (see `retry`).
    pub fn is_retryable_by_caller(&self) -> bool {
        matches!(self, BoomsError::TransientContended)
    }

    /// The stable string code used on the wire (matches spec.md's §7 taxonomy).
    pub fn code(&self) -> &'static str {
        match self {
            BoomsError::Validation(_) => "VALIDATION_ERROR",
            BoomsError::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            BoomsError::InsufficientRealFunds { .. } => "INSUFFICIENT_REAL_FUNDS",
            BoomsError::InsufficientVirtualFunds { .. } => "INSUFFICIENT_VIRTUAL_FUNDS",
            BoomsError::BoomUnavailable => "BOOM_UNAVAILABLE",
            BoomsError::StockExhausted => "STOCK_EXHAUSTED",
            BoomsError::HoldingNotOwned => "HOLDING_NOT_OWNED",
            BoomsError::HoldingNotTransferable => "HOLDING_NOT_TRANSFERABLE",
            BoomsError::GiftNotFound => "GIFT_NOT_FOUND",
            BoomsError::GiftExpired => "GIFT_EXPIRED",
            BoomsError::GiftInvalidTransition { .. } => "GIFT_INVALID_TRANSITION",
            BoomsError::GiftDuplicateRecent => "GIFT_DUPLICATE_RECENT",
            BoomsError::UserNotFound => "USER_NOT_FOUND",
            BoomsError::UserSuspended => "USER_SUSPENDED",
            BoomsError::UserBanned => "USER_BANNED",
            BoomsError::Forbidden => "FORBIDDEN",
            BoomsError::ProviderUnconfigured(_) => "PROVIDER_UNCONFIGURED",
            BoomsError::ProviderError(_) => "PROVIDER_ERROR",
            BoomsError::TransientContended => "TRANSIENT_CONTENDED",
            BoomsError::RateLimited => "RATE_LIMITED",
            BoomsError::Integrity(_) => "INTEGRITY_ERROR",
        }
    }
}

impl From<diesel::result::Error> for BoomsError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => BoomsError::Validation("record not found".into()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                _,
            ) => BoomsError::TransientContended,
            other => BoomsError::Integrity(other.to_string()),
        }
    }
}

pub type BoomsResult<T> = Result<T, BoomsError>;
