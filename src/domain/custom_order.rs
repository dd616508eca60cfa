use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrderStatus;

/// The option keys that drive custom cake pricing. `None` means the field was left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CakeSelection {
    pub size: Option<String>,
    pub flavor: Option<String>,
    pub frosting: Option<String>,
    pub filling: Option<String>,
    pub decorations: Option<String>,
}

impl CakeSelection {
    pub fn new(
        size: impl Into<String>,
        flavor: impl Into<String>,
        frosting: impl Into<String>,
        filling: impl Into<String>,
        decorations: impl Into<String>,
    ) -> Self {
        Self {
            size: Some(size.into()),
            flavor: Some(flavor.into()),
            frosting: Some(frosting.into()),
            filling: Some(filling.into()),
            decorations: Some(decorations.into()),
        }
    }
}

/// A customer's build-your-own-cake order, as stored in the `customOrders` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOrder {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub occasion: String,
    pub size: String,
    pub flavor: String,
    pub frosting: String,
    pub filling: String,
    pub decorations: String,
    #[serde(default)]
    pub message: Option<String>,
    pub delivery_date: NaiveDate,
    pub delivery_time: NaiveTime,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub price: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomOrder {
    pub fn selection(&self) -> CakeSelection {
        CakeSelection::new(
            self.size.clone(),
            self.flavor.clone(),
            self.frosting.clone(),
            self.filling.clone(),
            self.decorations.clone(),
        )
    }
}

/// Raw image attached to a submission. Only its storage URL is ever persisted.
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What the customer submits. The service turns this into a [`CustomOrderCreate`].
#[derive(Debug, Clone)]
pub struct CustomOrderDraft {
    pub occasion: String,
    pub selection: CakeSelection,
    pub message: Option<String>,
    pub delivery_date: NaiveDate,
    pub delivery_time: NaiveTime,
    pub allergies: String,
    pub special_instructions: String,
    pub reference_image: Option<ImageUpload>,
    /// Price shown to the customer at review time, if any.
    pub quoted_price: Option<i64>,
}

/// Fully resolved creation params handed to the store.
#[derive(Debug, Clone)]
pub struct CustomOrderCreate {
    pub user_id: String,
    pub user_email: String,
    pub occasion: String,
    pub size: String,
    pub flavor: String,
    pub frosting: String,
    pub filling: String,
    pub decorations: String,
    pub message: Option<String>,
    pub delivery_date: NaiveDate,
    pub delivery_time: NaiveTime,
    pub allergies: String,
    pub special_instructions: String,
    pub image_url: Option<String>,
    pub price: i64,
}
