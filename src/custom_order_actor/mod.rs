//! Build-your-own-cake orders (`customOrders` collection).

pub mod entity;
pub mod error;

pub use error::*;
