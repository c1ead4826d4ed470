use crate::middlewares::current_user;
use crate::models::*;
use crate::services::ReviewService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "review",
    params(
        ("meal_id" = i64, Query, description = "Meal ID"),
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Reviews with the meal's average rating", body = MealReviewsResponse)
    )
)]
pub async fn list_reviews(
    review_service: web::Data<ReviewService>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse> {
    match review_service.list_meal_reviews(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "review",
    request_body = CreateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid rating or comment"),
        (status = 403, description = "Not the buyer of this order"),
        (status = 409, description = "Order not completed or already reviewed")
    )
)]
pub async fn create_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match review_service.create_review(user.id, request.into_inner()).await {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(list_reviews))
            .route("", web::post().to(create_review)),
    );
}
