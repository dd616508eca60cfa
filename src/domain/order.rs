use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// A standard catalog order for a single product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub total: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a new order, after user, product and stock checks.
#[derive(Debug)]
pub struct OrderCreate {
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub total: i64,
}
