//! Shop records. Pure data with no actor concerns.

pub mod custom_order;
pub mod order;
pub mod product;
pub mod status;
pub mod user;

pub use custom_order::*;
pub use order::*;
pub use product::*;
pub use status::*;
pub use user::*;
