use crate::error::AppError;
use crate::external::MidtransNotification;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// Midtrans HTTP notification endpoint.
///
/// Bad signatures and unknown orders are rejected; any other failure is
/// logged and acknowledged so the gateway stops retrying.
#[utoipa::path(
    post,
    path = "/api/payments/midtrans/notification",
    tag = "payment",
    request_body = MidtransNotification,
    responses(
        (status = 200, description = "Notification processed or acknowledged", body = NotificationAck),
        (status = 401, description = "Invalid signature"),
        (status = 404, description = "Unknown order")
    )
)]
pub async fn midtrans_notification(
    payment_service: web::Data<PaymentService>,
    notification: web::Json<MidtransNotification>,
) -> Result<HttpResponse> {
    let order_id = notification.order_id.clone();

    match payment_service
        .handle_notification(notification.into_inner())
        .await
    {
        Ok(ack) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": ack
        }))),
        Err(e @ (AppError::AuthError(_) | AppError::NotFound(_))) => Ok(e.error_response()),
        Err(e) => {
            log::error!("Failed to process Midtrans notification for {order_id}: {e}");
            Ok(HttpResponse::Ok().json(json!({
                "success": false,
                "message": "Notification received"
            })))
        }
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/midtrans/notification", web::post().to(midtrans_notification)),
    );
}
