use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::catalog::ProductQuery;
use crate::clients::store_failure;
use crate::domain::{ImageUpload, Product, ProductForm, ProductPatch};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError, StockReservation};
use crate::storage::{product_image_path, BlobStore};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
    blobs: Arc<dyn BlobStore>,
}

impl_client_methods!(ProductClient, Product, ProductError, product);

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::DatabaseError(format!("Unexpected action result: {:?}", result))
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { inner, blobs }
    }

    /// Validates the admin form, uploads the optional image, then persists.
    #[instrument(skip(self, form, image), fields(product_name = %form.name))]
    pub async fn create_product(
        &self,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<Product, ProductError> {
        let mut params = form.validate().map_err(|msg| {
            warn!(error = %msg, "Product form rejected");
            ProductError::ValidationError(msg)
        })?;

        let uploaded_path = match image {
            Some(image) => {
                let path = product_image_path(Utc::now(), &image.filename);
                let url = self
                    .blobs
                    .put(&path, image.content_type.as_deref(), image.bytes)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Product image upload failed");
                        ProductError::from(e)
                    })?;
                params.image_url = Some(url);
                Some(path)
            }
            None => None,
        };

        debug!("Sending request");
        match self.inner.create(params).await {
            Ok(product) => {
                info!(product_id = %product.id, "Product created");
                Ok(product)
            }
            Err(e) => {
                if let Some(path) = uploaded_path {
                    if let Err(cleanup) = self.blobs.delete(&path).await {
                        warn!(error = %cleanup, path = %path, "Could not remove orphaned product image");
                    }
                }
                Err(store_failure(e))
            }
        }
    }

    /// Fetches every product and applies the query in memory.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        let all = self.inner.list(None).await.map_err(store_failure::<ProductError>)?;
        Ok(query.apply(&all).into_iter().cloned().collect())
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(store_failure)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: String) -> Result<(), ProductError> {
        debug!("Sending request");
        self.inner.delete(id).await.map_err(store_failure)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await {
            Ok(ProductActionResult::CheckStock(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(store_failure(e)),
        }
    }

    /// Takes `quantity` items out of stock, returning what remains.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await {
            Ok(ProductActionResult::ReserveStock(StockReservation::Reserved { remaining })) => Ok(remaining),
            Ok(ProductActionResult::ReserveStock(StockReservation::Insufficient { requested, available })) => {
                warn!(requested, available, "Not enough stock");
                Err(ProductError::InsufficientStock { requested, available })
            }
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(store_failure(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::Restock(quantity)).await {
            Ok(ProductActionResult::Restock(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(store_failure(e)),
        }
    }
}
