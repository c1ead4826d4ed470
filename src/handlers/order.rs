use crate::middlewares::{current_user, require_seller};
use crate::models::*;
use crate::services::OrderService;
use crate::utils::order_status::OrderAction;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "order",
    request_body = CheckoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order placed; online orders include the Snap token", body = CheckoutResponse),
        (status = 400, description = "Invalid input or not enough stock"),
        (status = 404, description = "Meal not found"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn checkout(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CheckoutRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match order_service.checkout(user.id, request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/orders/seller",
    tag = "order",
    params(
        ("status" = Option<String>, Query, description = "Display status: pending, pending_cod, confirmed_cod, processing, completed, cancelled"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Orders for the seller's meals"),
        (status = 400, description = "Unknown status filter"),
        (status = 403, description = "Not a seller")
    )
)]
pub async fn list_seller_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse> {
    let seller = require_seller(&req)?;

    match order_service.list_seller_orders(seller.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/update-status",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Target status cannot be set directly"),
        (status = 403, description = "Not allowed for this user"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn update_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match order_service
        .update_status(path.into_inner(), user.id, request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

async fn run_action(
    order_service: &OrderService,
    req: &HttpRequest,
    order_id: i64,
    action: OrderAction,
) -> Result<HttpResponse> {
    let user = current_user(req)?;

    match order_service.perform_action(order_id, user.id, action).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/confirm-cod",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "COD order confirmed", body = OrderResponse),
        (status = 403, description = "Only the seller may confirm"),
        (status = 409, description = "Order is not awaiting confirmation")
    )
)]
pub async fn confirm_cod(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    run_action(&order_service, &req, path.into_inner(), OrderAction::ConfirmCod).await
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/accept-cod-payment",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cash received, order is processing", body = OrderResponse),
        (status = 403, description = "Only the seller may accept payment"),
        (status = 409, description = "Order is not a confirmed COD order")
    )
)]
pub async fn accept_cod_payment(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    run_action(
        &order_service,
        &req,
        path.into_inner(),
        OrderAction::AcceptCodPayment,
    )
    .await
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/cancel",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order cancelled and stock restored", body = OrderResponse),
        (status = 403, description = "Not a party to this order"),
        (status = 409, description = "Order can no longer be cancelled")
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    run_action(&order_service, &req, path.into_inner(), OrderAction::Cancel).await
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/sync-payment",
    tag = "order",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order after reconciling with the gateway", body = OrderResponse),
        (status = 409, description = "Cash on delivery order"),
        (status = 502, description = "Gateway unavailable")
    )
)]
pub async fn sync_payment(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match order_service.sync_payment(path.into_inner(), user.id).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(checkout))
            .route("/seller", web::get().to(list_seller_orders))
            .route("/{id}/update-status", web::put().to(update_status))
            .route("/{id}/confirm-cod", web::put().to(confirm_cod))
            .route("/{id}/accept-cod-payment", web::put().to(accept_cod_payment))
            .route("/{id}/cancel", web::put().to(cancel_order))
            .route("/{id}/sync-payment", web::post().to(sync_payment)),
    );
}
