pub mod analytics;
pub mod common;
pub mod geocode;
pub mod meal;
pub mod message;
pub mod order;
pub mod pagination;
pub mod payment;
pub mod review;
pub mod user;

pub use analytics::*;
pub use common::*;
pub use geocode::*;
pub use meal::*;
pub use message::*;
pub use order::*;
pub use pagination::*;
pub use payment::*;
pub use review::*;
pub use user::*;
