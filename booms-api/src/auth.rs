//! JWT bearer-token authentication. Every trading endpoint requires a
//! valid token; `AuthUser` is an axum extractor that decodes it and
//! fails the request before any handler body runs.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use booms_core::BoomsError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: i64,
}

pub fn issue_token(user_id: i64, secret: &str, expire_minutes: i64) -> Result<String, BoomsError> {
    let claims = Claims { sub: user_id, exp: (Utc::now() + Duration::minutes(expire_minutes)).timestamp() };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| BoomsError::Integrity(e.to_string()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, BoomsError> {
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map_err(|_| BoomsError::Forbidden)?;
    Ok(data.claims)
}

/// The authenticated caller's user id, extracted from the
/// `Authorization: Bearer <token>` header.
pub struct AuthUser(pub i64);

#[async_trait::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(BoomsError::Forbidden)?;
        let token = header.strip_prefix("Bearer ").ok_or(BoomsError::Forbidden)?;
        let claims = decode_token(token, &state.jwt_secret)?;
        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_valid_token() {
        let token = issue_token(42, "test-secret", 60).unwrap();
        let claims = decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let token = issue_token(42, "test-secret", 60).unwrap();
        assert!(decode_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn rejects_an_expired_token() {
        let token = issue_token(42, "test-secret", -1).unwrap();
        assert!(decode_token(&token, "test-secret").is_err());
    }
}
