use crate::middlewares::current_user;
use crate::models::*;
use crate::services::MessageService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "message",
    request_body = SendMessageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Empty body or message to self"),
        (status = 404, description = "Recipient or meal not found")
    )
)]
pub async fn send_message(
    message_service: web::Data<MessageService>,
    req: HttpRequest,
    request: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match message_service.send_message(user.id, request.into_inner()).await {
        Ok(message) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": message
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "message",
    params(
        ("with" = i64, Query, description = "The other participant"),
        ("page" = Option<u32>, Query, description = "Page number, 1 is the most recent"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Conversation page, oldest first")
    )
)]
pub async fn get_conversation(
    message_service: web::Data<MessageService>,
    req: HttpRequest,
    query: web::Query<ConversationQuery>,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match message_service.get_conversation(user.id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    tag = "message",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Conversations, most recent first", body = [ConversationSummary])
    )
)]
pub async fn list_conversations(
    message_service: web::Data<MessageService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = current_user(&req)?;

    match message_service.list_conversations(user.id).await {
        Ok(conversations) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": conversations
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn message_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/messages")
            .route("", web::post().to(send_message))
            .route("", web::get().to(get_conversation))
            .route("/conversations", web::get().to(list_conversations)),
    );
}
