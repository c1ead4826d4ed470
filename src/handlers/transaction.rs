use crate::middlewares::current_user;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/transactions/user",
    tag = "transaction",
    params(
        ("status" = Option<String>, Query, description = "Display status filter"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's purchases, newest first"),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_user_transactions(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match order_service.list_buyer_orders(user.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "transaction",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order detail", body = OrderResponse),
        (status = 403, description = "Not a party to this order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_transaction(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match order_service.get_order(path.into_inner(), user.id).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn transaction_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .route("/user", web::get().to(list_user_transactions))
            .route("/{id}", web::get().to(get_transaction)),
    );
}
