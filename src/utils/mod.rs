pub mod jwt;
pub mod order_status;
pub mod password;
pub mod validation;

pub use jwt::*;
pub use password::*;
pub use validation::*;
