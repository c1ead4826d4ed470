use crate::middlewares::current_user;
use crate::models::*;
use crate::services::BookmarkService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/bookmarks",
    tag = "bookmark",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Bookmarked meals, newest first")
    )
)]
pub async fn list_bookmarks(
    bookmark_service: web::Data<BookmarkService>,
    req: HttpRequest,
    query: web::Query<BookmarkQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match bookmark_service.list_bookmarks(user.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/bookmarks/{meal_id}",
    tag = "bookmark",
    params(
        ("meal_id" = i64, Path, description = "Meal ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Bookmarked"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn add_bookmark(
    bookmark_service: web::Data<BookmarkService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match bookmark_service.add_bookmark(user.id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Bookmarked"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/bookmarks/{meal_id}",
    tag = "bookmark",
    params(
        ("meal_id" = i64, Path, description = "Meal ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Bookmark removed"),
        (status = 404, description = "Bookmark not found")
    )
)]
pub async fn remove_bookmark(
    bookmark_service: web::Data<BookmarkService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match bookmark_service.remove_bookmark(user.id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Bookmark removed"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bookmark_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookmarks")
            .route("", web::get().to(list_bookmarks))
            .route("/{meal_id}", web::post().to(add_bookmark))
            .route("/{meal_id}", web::delete().to(remove_bookmark)),
    );
}
