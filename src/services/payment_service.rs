use crate::entities::order_entity as orders;
use crate::error::{AppError, AppResult};
use crate::external::{MidtransNotification, MidtransService, parse_gross_amount};
use crate::models::NotificationAck;
use crate::services::{GatewayReport, OrderService};
use crate::utils::order_status::{self, GatewayDecision, OrderState};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    midtrans: MidtransService,
    order_service: OrderService,
}

impl PaymentService {
    pub fn new(
        pool: DatabaseConnection,
        midtrans: MidtransService,
        order_service: OrderService,
    ) -> Self {
        Self {
            pool,
            midtrans,
            order_service,
        }
    }

    /// Verifies and applies a Midtrans HTTP notification.
    pub async fn handle_notification(
        &self,
        notification: MidtransNotification,
    ) -> AppResult<NotificationAck> {
        self.midtrans.verify_signature(&notification)?;

        let order = orders::Entity::find()
            .filter(orders::Column::OrderCode.eq(notification.order_id.as_str()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Order {} not found", notification.order_id))
            })?;

        let amount = parse_gross_amount(&notification.gross_amount)?;
        if amount != order.total_price {
            return Err(AppError::ValidationError(format!(
                "Gross amount {} does not match order total {} for {}",
                amount, order.total_price, order.order_code
            )));
        }

        let Some(outcome) = notification.outcome() else {
            log::info!(
                "Ignoring '{}' notification for order {}",
                notification.transaction_status,
                order.order_code
            );
            return Ok(NotificationAck {
                display_status: order_status::display_status(OrderState::of(&order)),
                order_code: order.order_code,
                applied: false,
            });
        };

        log::info!(
            "Midtrans notification for {}: {} (fraud={:?}) -> {:?}",
            order.order_code,
            notification.transaction_status,
            notification.fraud_status,
            outcome
        );

        let report = GatewayReport {
            outcome,
            transaction_id: notification.transaction_id,
            payment_type: notification.payment_type,
        };
        let (order, decision) = self
            .order_service
            .apply_gateway_report(&order.order_code, report)
            .await?;

        Ok(NotificationAck {
            applied: matches!(decision, GatewayDecision::Apply(_)),
            display_status: order_status::display_status(OrderState::of(&order)),
            order_code: order.order_code,
        })
    }
}
