pub mod midtrans;
pub mod opencage;

pub use midtrans::*;
pub use opencage::*;
