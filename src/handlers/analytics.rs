use crate::middlewares::require_seller;
use crate::models::*;
use crate::services::AnalyticsService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/analytics/seller",
    tag = "analytics",
    params(
        ("days" = Option<u32>, Query, description = "Window size in days, 1-365 (default 30)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sales summary for the window", body = SellerAnalytics),
        (status = 400, description = "Window out of range"),
        (status = 403, description = "Not a seller")
    )
)]
pub async fn seller_analytics(
    analytics_service: web::Data<AnalyticsService>,
    req: HttpRequest,
    query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse> {
    let seller = require_seller(&req)?;

    match analytics_service.seller_analytics(seller.id, &query).await {
        Ok(analytics) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": analytics
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn analytics_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/analytics").route("/seller", web::get().to(seller_analytics)));
}
