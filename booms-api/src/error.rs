use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use booms_core::BoomsError;
use serde_json::json;

/// Wraps `BoomsError` so it can be returned directly from an axum
/// handler; the HTTP status mapping lives here since `booms-core` has
/// no notion of transport.
pub struct ApiError(pub BoomsError);

impl From<BoomsError> for ApiError {
    fn from(err: BoomsError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BoomsError::Validation(_) | BoomsError::UnsupportedCurrency(_) => StatusCode::BAD_REQUEST,
            BoomsError::InsufficientRealFunds { .. } | BoomsError::InsufficientVirtualFunds { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            BoomsError::BoomUnavailable
            | BoomsError::StockExhausted
            | BoomsError::GiftExpired
            | BoomsError::GiftDuplicateRecent => StatusCode::CONFLICT,
            BoomsError::HoldingNotOwned | BoomsError::Forbidden => StatusCode::FORBIDDEN,
            BoomsError::HoldingNotTransferable | BoomsError::GiftInvalidTransition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            BoomsError::GiftNotFound | BoomsError::UserNotFound => StatusCode::NOT_FOUND,
            BoomsError::UserSuspended | BoomsError::UserBanned => StatusCode::FORBIDDEN,
            BoomsError::ProviderUnconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            BoomsError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            BoomsError::TransientContended => StatusCode::CONFLICT,
            BoomsError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            BoomsError::Integrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": { "code": self.0.code(), "message": self.0.to_string() } }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_maps_to_429() {
        let response = ApiError(BoomsError::RateLimited).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn stock_exhausted_maps_to_409() {
        let response = ApiError(BoomsError::StockExhausted).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn holding_not_owned_maps_to_403() {
        let response = ApiError(BoomsError::HoldingNotOwned).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn integrity_error_maps_to_500() {
        let response = ApiError(BoomsError::Integrity("constraint violated".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
