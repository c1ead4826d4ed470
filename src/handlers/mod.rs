pub mod analytics;
pub mod auth;
pub mod bookmark;
pub mod geocode;
pub mod meal;
pub mod message;
pub mod order;
pub mod payment;
pub mod review;
pub mod transaction;
pub mod user;

pub use analytics::analytics_config;
pub use auth::auth_config;
pub use bookmark::bookmark_config;
pub use geocode::geocode_config;
pub use meal::meal_config;
pub use message::message_config;
pub use order::order_config;
pub use payment::payment_config;
pub use review::review_config;
pub use transaction::transaction_config;
pub use user::user_config;
