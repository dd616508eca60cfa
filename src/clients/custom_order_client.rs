use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{Predicate, ResourceClient};
use crate::clients::{newest_first, store_failure};
use crate::custom_order_actor::CustomOrderError;
use crate::domain::{
    CustomOrder, CustomOrderCreate, CustomOrderDraft, OrderStatus, StatusPolicy, StatusTransition,
    TransitionOutcome, User,
};
use crate::pricing::{CakeOption, PricingError, PricingTable};
use crate::storage::{custom_order_image_path, BlobStore};

/// Service for build-your-own-cake orders.
///
/// Owns the submission rules: the price is always recomputed from the
/// surcharge table, and a reference image is uploaded before the record
/// is written.
#[derive(Clone)]
pub struct CustomOrderClient {
    inner: ResourceClient<CustomOrder>,
    blobs: Arc<dyn BlobStore>,
    pricing: Arc<PricingTable>,
    policy: StatusPolicy,
}

impl_client_methods!(CustomOrderClient, CustomOrder, CustomOrderError, custom_order);

impl CustomOrderClient {
    pub fn new(
        inner: ResourceClient<CustomOrder>,
        blobs: Arc<dyn BlobStore>,
        pricing: Arc<PricingTable>,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            inner,
            blobs,
            pricing,
            policy,
        }
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    #[instrument(skip(self, draft, user), fields(user_id = %user.id, occasion = %draft.occasion))]
    pub async fn create(&self, draft: CustomOrderDraft, user: &User) -> Result<CustomOrder, CustomOrderError> {
        info!("Processing custom order submission");

        // Step 1: Price from the table, never from the client.
        let price = self.pricing.quote_strict(&draft.selection).map_err(|e| {
            warn!(error = %e, "Selection cannot be priced");
            CustomOrderError::from(e)
        })?;
        if let Some(quoted) = draft.quoted_price {
            if quoted != price {
                warn!(quoted, computed = price, "Quoted price does not match");
                return Err(CustomOrderError::PriceMismatch { quoted, computed: price });
            }
        }

        let selection = draft.selection;
        let size = required(selection.size, CakeOption::Size)?;
        let flavor = required(selection.flavor, CakeOption::Flavor)?;
        let frosting = required(selection.frosting, CakeOption::Frosting)?;
        let filling = required(selection.filling, CakeOption::Filling)?;
        let decorations = required(selection.decorations, CakeOption::Decorations)?;

        // Step 2: Upload the reference image, if any
        let mut uploaded = None;
        if let Some(image) = draft.reference_image {
            let path = custom_order_image_path(Utc::now(), &image.filename);
            let url = self
                .blobs
                .put(&path, image.content_type.as_deref(), image.bytes)
                .await
                .map_err(|e| {
                    error!(error = %e, "Reference image upload failed");
                    CustomOrderError::from(e)
                })?;
            debug!(path = %path, "Reference image uploaded");
            uploaded = Some((path, url));
        }

        // Step 3: Persist
        let params = CustomOrderCreate {
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            occasion: draft.occasion,
            size,
            flavor,
            frosting,
            filling,
            decorations,
            message: draft.message,
            delivery_date: draft.delivery_date,
            delivery_time: draft.delivery_time,
            allergies: draft.allergies,
            special_instructions: draft.special_instructions,
            image_url: uploaded.as_ref().map(|(_, url)| url.clone()),
            price,
        };

        match self.inner.create(params).await {
            Ok(order) => {
                info!(order_id = %order.id, price, "Custom order created");
                Ok(order)
            }
            Err(e) => {
                if let Some((path, _)) = uploaded {
                    if let Err(cleanup) = self.blobs.delete(&path).await {
                        warn!(error = %cleanup, path = %path, "Could not remove orphaned reference image");
                    }
                }
                Err(store_failure(e))
            }
        }
    }

    /// Returns the order if `caller` owns it or is an admin.
    #[instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn get_for(&self, caller: &User, id: String) -> Result<CustomOrder, CustomOrderError> {
        let order = self.require_custom_order(id.clone()).await?;
        if !caller.can_read(&order.user_id) {
            warn!("Custom order read refused");
            return Err(CustomOrderError::Forbidden(id));
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_by_user(&self, user_id: String) -> Result<Vec<CustomOrder>, CustomOrderError> {
        debug!("Sending request");
        let owned = Predicate::new(move |order: &CustomOrder| order.user_id == user_id);
        let orders = self.inner.list(Some(owned)).await.map_err(store_failure::<CustomOrderError>)?;
        Ok(newest_first(orders, |o| o.created_at))
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<CustomOrder>, CustomOrderError> {
        debug!("Sending request");
        let orders = self.inner.list(None).await.map_err(store_failure::<CustomOrderError>)?;
        Ok(newest_first(orders, |o| o.created_at))
    }

    /// Parses `status` and applies it under the configured policy.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: String, status: &str) -> Result<CustomOrder, CustomOrderError> {
        let to: OrderStatus = status.parse().map_err(|_| {
            warn!("Rejected unknown status");
            CustomOrderError::InvalidStatus(status.to_string())
        })?;
        let transition = StatusTransition { to, policy: self.policy };
        match self.inner.perform_action(id, transition).await.map_err(store_failure::<CustomOrderError>)? {
            TransitionOutcome::Applied(order) => {
                info!(order_id = %order.id, status = %order.status, "Custom order status updated");
                Ok(order)
            }
            TransitionOutcome::Refused { from, to } => {
                warn!(%from, %to, "Status transition refused");
                Err(CustomOrderError::InvalidTransition { from, to })
            }
        }
    }
}

fn required(value: Option<String>, option: CakeOption) -> Result<String, CustomOrderError> {
    value.ok_or(CustomOrderError::Pricing(PricingError::Unset(option)))
}
