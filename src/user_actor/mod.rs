//! User records: identity and role only.

pub mod entity;
pub mod error;

pub use error::*;
