mod domain;
mod clients;

mod app_system;
mod assignment;
mod error;
mod messages;
mod notify;
mod payment;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod actors;
mod shipper_actor;

use rust_decimal::Decimal;
use tracing::{info, warn, Instrument};

use crate::app_system::{setup_tracing, OrderSystem, SystemConfig};
use crate::domain::{
    CreateOrderRequest, DeliveryMethod, OrderLineRequest, OrderStatus, OrderUpdate, PaymentMethod,
    ProductCreate, ShipperCreate,
};
use crate::payment::{PaymentGateway, SignedRedirectGateway};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let config = SystemConfig::from_env();

    info!("Starting bloomline order system");
    let system = OrderSystem::new(&config);

    // Seed the catalog.
    let rose_id = system
        .inventory_client
        .add_product(ProductCreate {
            name: "Red Rose Bouquet".to_string(),
            price: Decimal::new(2550, 2),
            available_quantity: 5,
            published: true,
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(product_id = %rose_id, "Product seeded");

    // Register and verify a shipper.
    let shipper_id = system
        .shipper_client
        .register_shipper(ShipperCreate {
            name: "Dana".to_string(),
        })
        .await
        .map_err(|e| e.to_string())?;
    system
        .shipper_client
        .verify_shipper(shipper_id.clone())
        .await
        .map_err(|e| e.to_string())?;
    info!(shipper_id = %shipper_id, "Shipper verified");

    // Checkout.
    let span = tracing::info_span!("order_processing");
    let order = async {
        system
            .order_client
            .create_order(CreateOrderRequest {
                user_id: "user_1".to_string(),
                lines: vec![OrderLineRequest {
                    product_id: rose_id.clone(),
                    quantity: 3,
                }],
                payment_method: PaymentMethod::Bank,
                payment_status: None,
                delivery_method: DeliveryMethod::Shipping,
                address: Some("12 Orchard Lane".to_string()),
                phone: Some("555-0101".to_string()),
            })
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(order_id = %order.id, total = %order.total_amount, "Order placed");

    // The storefront would send the customer here to pay.
    let gateway = SignedRedirectGateway::new(
        config.gateway.merchant_code.clone(),
        config.gateway.base_url.clone(),
        &config.gateway.secret_key,
    );
    let redirect = gateway
        .build_redirect_url(&order.id, order.total_amount, &config.gateway.return_url)
        .await
        .map_err(|e| e.to_string())?;
    info!(%redirect, "Payment redirect built");

    // Admin moves the order along; SHIPPING triggers auto-assignment.
    for status in [OrderStatus::Verified, OrderStatus::Shipping] {
        let updated = system
            .order_client
            .transition_status(
                order.id.clone(),
                OrderUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| e.to_string())?;
        info!(order_id = %updated.id, status = %updated.status, shipper = ?updated.shipper_id, "Order transitioned");
    }

    // The assigned shipper completes the delivery.
    let delivered = system
        .order_client
        .mark_delivered(order.id.clone(), shipper_id)
        .await
        .map_err(|e| e.to_string())?;
    info!(order_id = %delivered.id, status = %delivered.status, "Order delivered");

    // Cancelling a delivered order must fail; show the guard in action.
    match system
        .order_client
        .cancel_order(order.id.clone(), "user_1".to_string())
        .await
    {
        Ok(_) => warn!("Cancel unexpectedly succeeded"),
        Err(e) => info!(error = %e, "Cancel rejected as expected"),
    }

    system.shutdown().await
}
