use std::sync::Arc;
use tracing::{error, info};

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::app_system::SystemError;
use crate::clients::{CustomOrderClient, OrderClient, ProductClient, UserClient};
use crate::config::ShopConfig;
use crate::domain::{CustomOrder, Order, Product, User};
use crate::pricing::PricingTable;
use crate::storage::{BlobStore, InMemoryBlobStore};
use crate::wizard::CustomOrderWizard;

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
/// Clients are handed out explicitly; nothing is reachable through globals.
pub struct ShopSystem {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub custom_order_client: CustomOrderClient,
    pub blobs: Arc<InMemoryBlobStore>,
    pricing: Arc<PricingTable>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ShopSystem {
    pub fn new(config: &ShopConfig) -> Self {
        info!(policy = ?config.status_policy, "Starting shop system");
        let buffer = config.channel_buffer;
        let blobs = Arc::new(InMemoryBlobStore::new(config.storage_base_url.clone()));
        let blob_store: Arc<dyn BlobStore> = blobs.clone();
        let pricing = Arc::new(config.pricing.clone());

        // 1. Users
        let (user_actor, user_resource_client) = ResourceActor::<User>::new("users", buffer, sequential_ids("user"));
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Products
        let (product_actor, product_resource_client) =
            ResourceActor::<Product>::new("products", buffer, sequential_ids("product"));
        let product_client = ProductClient::new(product_resource_client, blob_store.clone());
        let product_handle = tokio::spawn(product_actor.run());

        // 3. Standard orders
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new("orders", buffer, sequential_ids("order"));
        let order_client = OrderClient::new(
            order_resource_client,
            user_client.clone(),
            product_client.clone(),
            config.status_policy,
        );
        let order_handle = tokio::spawn(order_actor.run());

        // 4. Custom orders
        let (custom_order_actor, custom_order_resource_client) =
            ResourceActor::<CustomOrder>::new("custom_orders", buffer, sequential_ids("custom_order"));
        let custom_order_client = CustomOrderClient::new(
            custom_order_resource_client,
            blob_store,
            pricing.clone(),
            config.status_policy,
        );
        let custom_order_handle = tokio::spawn(custom_order_actor.run());

        Self {
            user_client,
            product_client,
            order_client,
            custom_order_client,
            blobs,
            pricing,
            handles: vec![user_handle, product_handle, order_handle, custom_order_handle],
        }
    }

    /// A fresh form sharing the system's surcharge table.
    pub fn custom_order_wizard(&self, today: chrono::NaiveDate) -> CustomOrderWizard {
        CustomOrderWizard::new(self.pricing.clone(), today)
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        // Actors stop once every client handle is gone.
        drop(self.custom_order_client);
        drop(self.order_client);
        drop(self.product_client);
        drop(self.user_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::from(e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
