use crate::middlewares::{optional_user, require_seller};
use crate::models::*;
use crate::services::MealService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/meals",
    tag = "meal",
    params(
        ("search" = Option<String>, Query, description = "Matches name or description"),
        ("category" = Option<String>, Query, description = "Category"),
        ("seller_id" = Option<i64>, Query, description = "Only this seller's meals"),
        ("min_price" = Option<i64>, Query, description = "Minimum price (Rupiah)"),
        ("max_price" = Option<i64>, Query, description = "Maximum price (Rupiah)"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Available meals, newest first")
    )
)]
pub async fn list_meals(
    meal_service: web::Data<MealService>,
    query: web::Query<MealQuery>,
) -> Result<HttpResponse> {
    match meal_service.list_meals(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/meals/{id}",
    tag = "meal",
    params(
        ("id" = i64, Path, description = "Meal ID")
    ),
    responses(
        (status = 200, description = "Meal detail with rating", body = MealResponse),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn get_meal(
    meal_service: web::Data<MealService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let viewer = optional_user(&req).map(|u| u.id);

    match meal_service.get_meal(path.into_inner(), viewer).await {
        Ok(meal) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": meal
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/meals/seller",
    tag = "meal",
    params(
        ("include_inactive" = Option<bool>, Query, description = "Include deactivated meals (default true)"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The seller's own meals"),
        (status = 403, description = "Not a seller")
    )
)]
pub async fn list_my_meals(
    meal_service: web::Data<MealService>,
    req: HttpRequest,
    query: web::Query<SellerMealQuery>,
) -> Result<HttpResponse> {
    let seller = require_seller(&req)?;

    match meal_service.list_seller_meals(seller.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/meals",
    tag = "meal",
    request_body = CreateMealRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Meal created", body = MealResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not a seller")
    )
)]
pub async fn create_meal(
    meal_service: web::Data<MealService>,
    req: HttpRequest,
    request: web::Json<CreateMealRequest>,
) -> Result<HttpResponse> {
    let seller = require_seller(&req)?;

    match meal_service.create_meal(seller.id, request.into_inner()).await {
        Ok(meal) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": meal
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/meals/{id}",
    tag = "meal",
    params(
        ("id" = i64, Path, description = "Meal ID")
    ),
    request_body = UpdateMealRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Meal updated", body = MealResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn update_meal(
    meal_service: web::Data<MealService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateMealRequest>,
) -> Result<HttpResponse> {
    let seller = require_seller(&req)?;

    match meal_service
        .update_meal(seller.id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(meal) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": meal
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/meals/{id}",
    tag = "meal",
    params(
        ("id" = i64, Path, description = "Meal ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Meal deactivated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn delete_meal(
    meal_service: web::Data<MealService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let seller = require_seller(&req)?;

    match meal_service.delete_meal(seller.id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Meal removed"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn meal_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/meals")
            .route("", web::get().to(list_meals))
            .route("", web::post().to(create_meal))
            // before /{id}
            .route("/seller", web::get().to(list_my_meals))
            .route("/{id}", web::get().to(get_meal))
            .route("/{id}", web::put().to(update_meal))
            .route("/{id}", web::delete().to(delete_meal)),
    );
}
