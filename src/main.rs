mod domain;
mod clients;

mod app_system;
mod config;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod user_actor;
mod product_actor;
mod order_actor;
mod custom_order_actor;

mod admin;
mod catalog;
mod pricing;
mod storage;
mod wizard;

use chrono::{Days, Utc};
use tracing::{error, info, Instrument};

use crate::admin::{filter_by_status, StatusCounts, StatusFilter};
use crate::app_system::{setup_tracing, ShopSystem, SystemError};
use crate::catalog::{ProductQuery, ProductSort};
use crate::config::ShopConfig;
use crate::domain::{ImageUpload, OrderStatus, ProductForm, User};
use crate::wizard::{DeliveryStep, DetailsStep, StyleStep};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = ShopConfig::load()?;
    setup_tracing(&config.log_filter);

    info!("Starting bakery shop");
    let system = ShopSystem::new(&config);

    // Accounts
    let customer = system
        .user_client
        .create_user(User::new("Alice", "alice@example.com"))
        .await?;
    let admin = system
        .user_client
        .create_user(User::admin("Bea", "bea@example.com"))
        .await?;
    info!(customer_id = %customer.id, admin_id = %admin.id, "Accounts ready");

    // Catalog
    let span = tracing::info_span!("catalog_setup");
    let mug = async {
        let mug = ProductForm {
            name: "Stoneware Mug".into(),
            description: "Hand-thrown, glazed inside".into(),
            price: "1800".into(),
            stock: "12".into(),
            category: "mugs".into(),
            tags: vec!["gift".into(), "handmade".into()],
            ..ProductForm::default()
        };
        let candle = ProductForm {
            name: "Amber Candle".into(),
            price: "2200".into(),
            stock: "5".into(),
            category: "candle".into(),
            tags: vec!["gift".into()],
            ..ProductForm::default()
        };
        system.product_client.create_product(candle, None).await?;
        let mug = system.product_client.create_product(mug, None).await?;
        Ok::<_, SystemError>(mug)
    }
    .instrument(span)
    .await?;

    let gifts = ProductQuery {
        tags: vec!["gift".into()],
        sort: ProductSort::PriceAsc,
        ..ProductQuery::default()
    };
    let shelf = system.product_client.list_products(&gifts).await?;
    info!(count = shelf.len(), "Gift shelf listed");

    // Standard order; a failure here is reported but not fatal.
    let span = tracing::info_span!("order_processing");
    let order_result = async {
        system
            .order_client
            .create_order(customer.id.clone(), mug.id.clone(), 2)
            .await
    }
    .instrument(span)
    .await;
    match order_result {
        Ok(order) => info!(order_id = %order.id, total = order.total, "Order processed successfully"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    // Custom cake through the form wizard
    let today = Utc::now().date_naive();
    let delivery_date = today.checked_add_days(Days::new(7)).unwrap_or(today);
    let mut wizard = system.custom_order_wizard(today);
    wizard.details = DetailsStep {
        occasion: "Birthday".into(),
        size: "8-inch".into(),
    };
    wizard.next()?;
    wizard.style = StyleStep {
        flavor: "chocolate".into(),
        frosting: "ganache".into(),
        filling: "none".into(),
        decorations: "message".into(),
        message: "Happy birthday, Alice!".into(),
        reference_image: Some(ImageUpload {
            filename: "party theme.png".into(),
            content_type: Some("image/png".into()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }),
    };
    wizard.next()?;
    wizard.delivery = DeliveryStep {
        delivery_date: delivery_date.format("%Y-%m-%d").to_string(),
        delivery_time: "14:00".into(),
        ..DeliveryStep::default()
    };
    wizard.next()?;
    let quote = wizard.quote()?;
    info!(total = quote.total, lines = quote.lines.len(), "Review quote");
    let cake = wizard.submit(&system.custom_order_client, &customer).await?;
    for path in system.blobs.paths().await {
        if let Some(blob) = system.blobs.get(&path).await {
            info!(path = %path, len = blob.bytes.len(), content_type = ?blob.content_type, "Stored upload");
        }
    }

    // Admin view
    let all = system.custom_order_client.list_all().await?;
    let counts = StatusCounts::tally(&all);
    let pending = filter_by_status(&all, StatusFilter::Only(OrderStatus::Pending));
    info!(total = counts.total(), pending = pending.len(), "Custom orders loaded");
    for order in &all {
        // The table may have changed since the order was priced.
        let current = system.custom_order_client.pricing().quote(&order.selection());
        if current != order.price {
            info!(order_id = %order.id, charged = order.price, current, "Price differs from current table");
        }
    }

    let cake = system
        .custom_order_client
        .update_status(cake.id, OrderStatus::Confirmed.as_str())
        .await?;
    let visible = system.custom_order_client.get_for(&admin, cake.id.clone()).await?;
    info!(order_id = %visible.id, status = %visible.status, "Custom order confirmed");

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
