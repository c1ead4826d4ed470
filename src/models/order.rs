use crate::entities::{
    OrderStatus, OrderType, PaymentMethod, PaymentStatus, order_entity,
};
use crate::utils::order_status::{self, Actor, DisplayStatus, OrderAction, OrderState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub meal_id: i64,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "Budi Santoso")]
    pub buyer_name: String,
    #[schema(example = "budi@example.com")]
    pub buyer_email: String,
    #[schema(example = "081234567890")]
    pub buyer_phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    #[schema(example = "12190")]
    pub postal_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub order_type: OrderType,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: OrderResponse,
    /// Snap token for the payment popup (online payment only).
    pub snap_token: Option<String>,
    pub redirect_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListQuery {
    /// Display status filter, e.g. `pending_cod`.
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[schema(example = "completed")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_code: String,
    pub meal_id: i64,
    pub meal_name: Option<String>,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub quantity: i32,
    pub total_price: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub order_type: OrderType,
    pub display_status: DisplayStatus,
    /// What the requesting party may do next.
    pub actions: Vec<OrderAction>,
    pub special_instructions: Option<String>,
    pub snap_redirect_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderResponse {
    pub fn build(m: order_entity::Model, meal_name: Option<String>, viewer: Actor) -> Self {
        let display = order_status::display_status(OrderState::of(&m));
        let actions = order_status::actions_for(display, viewer).to_vec();
        // the payment page is only useful to the buyer
        let snap_redirect_url = match viewer {
            Actor::Buyer => m.snap_redirect_url,
            Actor::Seller => None,
        };

        Self {
            id: m.id,
            order_code: m.order_code,
            meal_id: m.meal_id,
            meal_name,
            buyer_id: m.buyer_id,
            seller_id: m.seller_id,
            buyer_name: m.buyer_name,
            buyer_email: m.buyer_email,
            buyer_phone: m.buyer_phone,
            address: m.address,
            city: m.city,
            postal_code: m.postal_code,
            quantity: m.quantity,
            total_price: m.total_price,
            status: m.status,
            payment_status: m.payment_status,
            payment_method: m.payment_method,
            order_type: m.order_type,
            display_status: display,
            actions,
            special_instructions: m.special_instructions,
            snap_redirect_url,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            paid_at: m.paid_at,
            confirmed_at: m.confirmed_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn order(
        id: i64,
        status: OrderStatus,
        payment_status: PaymentStatus,
        payment_method: PaymentMethod,
    ) -> order_entity::Model {
        order_entity::Model {
            id,
            order_code: format!("GMS-{id}"),
            buyer_id: 10,
            seller_id: 20,
            meal_id: 1,
            buyer_name: "Budi".to_string(),
            buyer_email: "budi@example.com".to_string(),
            buyer_phone: "081234567890".to_string(),
            address: None,
            city: None,
            postal_code: None,
            quantity: 1,
            total_price: 15000,
            status,
            payment_status,
            payment_method,
            order_type: OrderType::Pickup,
            special_instructions: None,
            snap_token: Some("snap-token".to_string()),
            snap_redirect_url: Some("https://app.sandbox.midtrans.com/snap/v2/x".to_string()),
            gateway_transaction_id: None,
            gateway_payment_type: None,
            created_at: Some(Utc::now()),
            paid_at: None,
            confirmed_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::order;
    use super::*;

    #[test]
    fn test_response_carries_display_status_and_actions_per_viewer() {
        let m = order(
            1,
            OrderStatus::Pending,
            PaymentStatus::PendingCod,
            PaymentMethod::CashOnDelivery,
        );

        let seller_view = OrderResponse::build(m.clone(), Some("Nasi".into()), Actor::Seller);
        assert_eq!(seller_view.display_status, DisplayStatus::PendingCod);
        assert_eq!(
            seller_view.actions,
            vec![OrderAction::ConfirmCod, OrderAction::Cancel]
        );
        assert!(seller_view.snap_redirect_url.is_none());

        let buyer_view = OrderResponse::build(m, None, Actor::Buyer);
        assert_eq!(buyer_view.display_status, DisplayStatus::PendingCod);
        assert_eq!(buyer_view.actions, vec![OrderAction::Cancel]);
    }

    #[test]
    fn test_serialized_statuses_are_snake_case() {
        let m = order(
            2,
            OrderStatus::AwaitingPayment,
            PaymentStatus::Pending,
            PaymentMethod::Midtrans,
        );
        let value = serde_json::to_value(OrderResponse::build(m, None, Actor::Buyer)).unwrap();
        assert_eq!(value["status"], "awaiting_payment");
        assert_eq!(value["display_status"], "pending");
        assert_eq!(value["actions"], serde_json::json!(["pay", "cancel"]));
        assert!(value["snap_redirect_url"].is_string());
    }
}
