//! Standard catalog orders.

pub mod entity;
pub mod error;

pub use error::*;
