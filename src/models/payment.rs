use crate::utils::order_status::DisplayStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned to the gateway after a notification has been processed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationAck {
    pub order_code: String,
    /// Whether the notification changed the order.
    pub applied: bool,
    pub display_status: DisplayStatus,
}
