use crate::entities::message_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub meal_id: Option<i64>,
    #[schema(example = "Is the nasi goreng still available?")]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationQuery {
    /// The other participant.
    pub with: i64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub meal_id: Option<i64>,
    pub body: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<message_entity::Model> for MessageResponse {
    fn from(m: message_entity::Model) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            recipient_id: m.recipient_id,
            meal_id: m.meal_id,
            body: m.body,
            read_at: m.read_at,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummary {
    pub partner_id: i64,
    pub partner_name: Option<String>,
    pub last_message: MessageResponse,
    pub unread_count: u64,
}
