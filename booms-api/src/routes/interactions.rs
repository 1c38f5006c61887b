use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::events_publish::publish_social_outcome;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use booms_core::db::schema::booms;
use booms_core::interactions::record as record_interaction;
use booms_core::models::{ActionType, Boom};
use booms_core::BoomsError;
use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RecordInteractionRequest {
    pub boom_id: i64,
    pub action: ActionType,
    #[serde(default = "default_metadata")]
    pub metadata: Value,
}

fn default_metadata() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Serialize)]
pub struct RecordInteractionResponse {
    pub market_value: bigdecimal::BigDecimal,
    pub applied_micro_value: bigdecimal::BigDecimal,
}

pub async fn record(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<RecordInteractionRequest>,
) -> Result<Json<RecordInteractionResponse>, ApiError> {
    let mut conn = state.conn().await?;
    let boom_id = request.boom_id;
    let outcome = conn
        .transaction::<_, BoomsError, _>(|conn| {
            Box::pin(async move {
                record_interaction(
                    conn,
                    user_id,
                    boom_id,
                    request.action,
                    None,
                    booms_core::social::ActionMetadata::default(),
                    request.metadata,
                )
                .await
            })
        })
        .await
        .map_err(ApiError)?;

    let boom: Boom = booms::table.find(boom_id).get_result(&mut conn).await.map_err(BoomsError::from)?;
    publish_social_outcome(&state.events, boom_id, boom.market_value(), boom.applied_micro_value.clone(), &outcome);

    Ok(Json(RecordInteractionResponse {
        market_value: boom.market_value(),
        applied_micro_value: boom.applied_micro_value,
    }))
}
