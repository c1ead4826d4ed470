use crate::error::AppError;
use crate::external::OpenCageService;
use crate::models::*;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/geocode",
    tag = "geocode",
    params(
        ("address" = String, Query, description = "Free-form address")
    ),
    responses(
        (status = 200, description = "Coordinates for the address", body = GeocodeResponse),
        (status = 404, description = "No variant of the address could be located"),
        (status = 502, description = "Geocoding provider error")
    )
)]
pub async fn geocode(
    geocoder: web::Data<OpenCageService>,
    query: web::Query<GeocodeQuery>,
) -> Result<HttpResponse> {
    match geocoder.geocode_with_fallback(&query.address).await {
        Ok(Some(location)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": location
        }))),
        Ok(None) => Ok(AppError::NotFound("Address not found".to_string()).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn geocode_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/geocode", web::get().to(geocode));
}
