use crate::auth::issue_token;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use bigdecimal::BigDecimal;
use booms_core::db::schema::{real_balances, users, virtual_balances};
use booms_core::models::{LoyaltyTier, NewUser, User, UserStatus};
use booms_core::BoomsError;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub email: Option<String>,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.password.len() < 8 {
        return Err(BoomsError::Validation("password must be at least 8 characters".into()).into());
    }
    let password_hash =
        bcrypt::hash(&request.password, bcrypt::DEFAULT_COST).map_err(|e| BoomsError::Integrity(e.to_string()))?;

    let mut conn = state.conn().await?;
    let now = Utc::now();
    let new_user = NewUser {
        phone: request.phone,
        email: request.email,
        password_hash,
        full_name: request.full_name,
        status: UserStatus::Active,
        is_admin: false,
        loyalty_tier: LoyaltyTier::Bronze,
        created_at: now,
        updated_at: now,
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result(&mut conn)
        .await
        .map_err(BoomsError::from)?;

    diesel::insert_into(real_balances::table)
        .values((
            real_balances::user_id.eq(user.id),
            real_balances::available.eq(BigDecimal::from(0)),
            real_balances::locked.eq(BigDecimal::from(0)),
            real_balances::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(BoomsError::from)?;

    diesel::insert_into(virtual_balances::table)
        .values((
            virtual_balances::user_id.eq(user.id),
            virtual_balances::balance.eq(BigDecimal::from(0)),
            virtual_balances::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(BoomsError::from)?;

    let token = issue_token(user.id, &state.jwt_secret, state.config.access_token_expire_minutes)?;
    Ok(Json(AuthResponse { token, user_id: user.id }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let user: User = users::table
        .filter(users::phone.eq(&request.phone))
        .get_result(&mut conn)
        .await
        .map_err(|_| BoomsError::UserNotFound)?;

    user.assert_can_trade()?;

    let verified = bcrypt::verify(&request.password, &user.password_hash).unwrap_or(false);
    if !verified {
        return Err(BoomsError::Forbidden.into());
    }

    let token = issue_token(user.id, &state.jwt_secret, state.config.access_token_expire_minutes)?;
    Ok(Json(AuthResponse { token, user_id: user.id }))
}
