pub mod analytics_service;
pub mod auth_service;
pub mod bookmark_service;
pub mod meal_service;
pub mod message_service;
pub mod order_service;
pub mod payment_service;
pub mod review_service;
pub mod user_service;

pub use analytics_service::*;
pub use auth_service::*;
pub use bookmark_service::*;
pub use meal_service::*;
pub use message_service::*;
pub use order_service::*;
pub use payment_service::*;
pub use review_service::*;
pub use user_service::*;
