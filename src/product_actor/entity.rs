use chrono::Utc;

use super::actions::{ProductAction, ProductActionResult, StockReservation};
use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from validated creation parameters.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Product name required".to_string());
        }
        if params.price < 0 {
            return Err(format!("Negative price: {}", params.price));
        }
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            stock: params.stock,
            category: params.category,
            tags: params.tags,
            materials: params.materials,
            features: params.features,
            image_url: params.image_url,
            safety: params.safety,
            created_at: Utc::now(),
        })
    }

    /// Applies the provided fields; absent fields keep their value.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if matches!(patch.price, Some(price) if price < 0) {
            return Err("Negative price".to_string());
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(amount) => {
                let outcome = if self.stock >= amount {
                    self.stock -= amount;
                    StockReservation::Reserved { remaining: self.stock }
                } else {
                    StockReservation::Insufficient {
                        requested: amount,
                        available: self.stock,
                    }
                };
                Ok(ProductActionResult::ReserveStock(outcome))
            }
            ProductAction::Restock(amount) => {
                self.stock = self
                    .stock
                    .checked_add(amount)
                    .ok_or_else(|| format!("Stock overflow adding {}", amount))?;
                Ok(ProductActionResult::Restock(self.stock))
            }
        }
    }
}
