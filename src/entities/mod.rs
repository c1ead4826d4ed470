pub mod bookmarks;
pub mod meals;
pub mod messages;
pub mod orders;
pub mod reviews;
pub mod users;

pub use bookmarks as bookmark_entity;
pub use meals as meal_entity;
pub use messages as message_entity;
pub use orders as order_entity;
pub use reviews as review_entity;
pub use users as user_entity;

pub use orders::{OrderStatus, OrderType, PaymentMethod, PaymentStatus};
pub use users::UserRole;
