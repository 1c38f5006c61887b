use crate::db::schema::interactions;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw user-BOOM action (spec.md §3). Feeds the social-value engine
/// via `interactions::record`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, diesel_derive_enum::DbEnum,
)]
#[ExistingTypePath = "crate::db::schema::sql_types::ActionType"]
pub enum ActionType {
    Like,
    Share,
    View,
    Comment,
    ShareInternal,
    Buy,
    Sell,
    Gift,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Like => "like",
            ActionType::Share => "share",
            ActionType::View => "view",
            ActionType::Comment => "comment",
            ActionType::ShareInternal => "share_internal",
            ActionType::Buy => "buy",
            ActionType::Sell => "sell",
            ActionType::Gift => "gift",
        }
    }
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = interactions)]
pub struct Interaction {
    pub id: i64,
    pub user_id: i64,
    pub boom_id: i64,
    pub action_type: ActionType,
    pub metadata: serde_json::Value,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = interactions)]
pub struct NewInteraction {
    pub user_id: i64,
    pub boom_id: i64,
    pub action_type: ActionType,
    pub metadata: serde_json::Value,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}
