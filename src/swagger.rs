use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{OrderStatus, OrderType, PaymentMethod, PaymentStatus, UserRole};
use crate::external::MidtransNotification;
use crate::handlers;
use crate::models::*;
use crate::utils::order_status::{DisplayStatus, OrderAction};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::user::get_profile,
        handlers::user::update_profile,
        handlers::meal::list_meals,
        handlers::meal::get_meal,
        handlers::meal::list_my_meals,
        handlers::meal::create_meal,
        handlers::meal::update_meal,
        handlers::meal::delete_meal,
        handlers::bookmark::list_bookmarks,
        handlers::bookmark::add_bookmark,
        handlers::bookmark::remove_bookmark,
        handlers::order::checkout,
        handlers::order::list_seller_orders,
        handlers::order::update_status,
        handlers::order::confirm_cod,
        handlers::order::accept_cod_payment,
        handlers::order::cancel_order,
        handlers::order::sync_payment,
        handlers::transaction::list_user_transactions,
        handlers::transaction::get_transaction,
        handlers::payment::midtrans_notification,
        handlers::review::list_reviews,
        handlers::review::create_review,
        handlers::message::send_message,
        handlers::message::get_conversation,
        handlers::message::list_conversations,
        handlers::geocode::geocode,
        handlers::analytics::seller_analytics,
    ),
    components(
        schemas(
            ApiError,
            UserRole,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            AuthResponse,
            UserResponse,
            UpdateProfileRequest,
            SellerSummary,
            CreateMealRequest,
            UpdateMealRequest,
            MealResponse,
            BookmarkResponse,
            OrderStatus,
            PaymentStatus,
            PaymentMethod,
            OrderType,
            DisplayStatus,
            OrderAction,
            CheckoutRequest,
            CheckoutResponse,
            UpdateOrderStatusRequest,
            OrderResponse,
            MidtransNotification,
            NotificationAck,
            CreateReviewRequest,
            ReviewResponse,
            MealReviewsResponse,
            SendMessageRequest,
            MessageResponse,
            ConversationSummary,
            GeocodeResponse,
            TopMeal,
            DailyRevenue,
            SellerAnalytics,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and tokens"),
        (name = "user", description = "Own profile"),
        (name = "meal", description = "Surplus meal catalogue"),
        (name = "bookmark", description = "Saved meals"),
        (name = "order", description = "Checkout and seller order management"),
        (name = "transaction", description = "Buyer purchase history"),
        (name = "payment", description = "Midtrans callbacks"),
        (name = "review", description = "Meal reviews"),
        (name = "message", description = "Buyer-seller chat"),
        (name = "geocode", description = "Address lookup"),
        (name = "analytics", description = "Seller sales summary"),
    ),
    info(
        title = "GoMealSaver API",
        version = "1.0.0",
        description = "REST API for the GoMealSaver surplus food marketplace"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_order_endpoints() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/orders/{id}/confirm-cod"));
        assert!(paths.contains_key("/api/payments/midtrans/notification"));
        assert!(paths.contains_key("/api/transactions/user"));
    }
}
