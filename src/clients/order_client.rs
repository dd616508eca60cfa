use tracing::{error, info, instrument, warn};

use crate::actor_framework::{Predicate, ResourceClient};
use crate::clients::{newest_first, store_failure, ProductClient, UserClient};
use crate::domain::{Order, OrderCreate, OrderStatus, StatusPolicy, StatusTransition, TransitionOutcome, User};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

/// Client for interacting with the Order actor.
///
/// This client handles orchestration, validating users and products and
/// reserving stock before creating an order.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    policy: StatusPolicy,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            policy,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        user_id: String,
        product_id: String,
        quantity: u32,
    ) -> Result<Order, OrderError> {
        info!("Processing create_order request");
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        // Step 1: Validate user
        match self.user_client.get_user(user_id.clone()).await {
            Ok(Some(user)) => info!(user_name = %user.name, "User validation successful"),
            Ok(None) => {
                error!("User not found");
                return Err(OrderError::InvalidUser(user_id));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(OrderError::InvalidUser(format!("User validation failed: {}", e)));
            }
        }

        // Step 2: Validate product
        let product = match self.product_client.get_product(product_id.clone()).await {
            Ok(Some(product)) => {
                info!(product_name = %product.name, "Product validation successful");
                product
            }
            Ok(None) => {
                error!("Product not found");
                return Err(OrderError::InvalidProduct(product_id));
            }
            Err(e) => {
                error!(error = %e, "Product validation failed");
                return Err(OrderError::InvalidProduct(format!("Product validation failed: {}", e)));
            }
        };

        // Step 3: Price the order before any stock is taken
        let total = product.price.checked_mul(i64::from(quantity)).ok_or_else(|| {
            error!(price = product.price, quantity, "Order total overflows");
            OrderError::InvalidQuantity(quantity)
        })?;

        // Step 4: Reserve stock
        match self.product_client.reserve_stock(product_id.clone(), quantity).await {
            Ok(remaining) => info!(remaining, "Stock reserved successfully"),
            Err(ProductError::InsufficientStock { requested, available }) => {
                error!(requested, available, "Stock reservation failed");
                return Err(OrderError::InsufficientStock { requested, available });
            }
            Err(e) => {
                error!(error = %e, "Stock reservation failed");
                return Err(OrderError::InvalidProduct(format!("Stock reservation failed: {}", e)));
            }
        }

        // Step 5: Create order
        let params = OrderCreate {
            user_id,
            product_id: product_id.clone(),
            quantity,
            total,
        };
        match self.inner.create(params).await {
            Ok(order) => {
                info!(order_id = %order.id, total = order.total, "Order created successfully");
                Ok(order)
            }
            Err(e) => {
                // Give the reserved items back before reporting the failure.
                if let Err(restock) = self.product_client.restock(product_id, quantity).await {
                    warn!(error = %restock, "Could not release reserved stock");
                }
                Err(store_failure(e))
            }
        }
    }

    /// Returns the order if `caller` owns it or is an admin.
    #[instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn get_for(&self, caller: &User, id: String) -> Result<Order, OrderError> {
        let order = self.require_order(id.clone()).await?;
        if !caller.can_read(&order.user_id) {
            warn!("Order read refused");
            return Err(OrderError::Forbidden(id));
        }
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn list_by_user(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        let owned = Predicate::new(move |order: &Order| order.user_id == user_id);
        let orders = self.inner.list(Some(owned)).await.map_err(store_failure::<OrderError>)?;
        Ok(newest_first(orders, |o| o.created_at))
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        let orders = self.inner.list(None).await.map_err(store_failure::<OrderError>)?;
        Ok(newest_first(orders, |o| o.created_at))
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: String, status: &str) -> Result<Order, OrderError> {
        let to: OrderStatus = status.parse().map_err(|_| {
            warn!("Rejected unknown status");
            OrderError::InvalidStatus(status.to_string())
        })?;
        let transition = StatusTransition { to, policy: self.policy };
        match self.inner.perform_action(id, transition).await.map_err(store_failure::<OrderError>)? {
            TransitionOutcome::Applied(order) => {
                info!(order_id = %order.id, status = %order.status, "Order status updated");
                Ok(order)
            }
            TransitionOutcome::Refused { from, to } => {
                warn!(%from, %to, "Status transition refused");
                Err(OrderError::InvalidTransition { from, to })
            }
        }
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);
