use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::actors::{InventoryActor, OrderActor};
use crate::app_system::SystemConfig;
use crate::clients::{InventoryClient, OrderClient, ShipperClient};
use crate::domain::Shipper;
use crate::notify::{LoggingNotifier, NotificationSender};

/// The main application system that wires all actors together.
///
/// Responsible for starting the actors, building their clients, and handling
/// shutdown.
pub struct OrderSystem {
    pub inventory_client: InventoryClient,
    pub order_client: OrderClient,
    pub shipper_client: ShipperClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_notifier(config, Arc::new(LoggingNotifier))
    }

    /// Same wiring with a caller-supplied notifier, used by tests.
    pub fn with_notifier(config: &SystemConfig, notifier: Arc<dyn NotificationSender>) -> Self {
        let capacity = config.mailbox_capacity;

        // 1. Inventory ledger (bespoke actor: batch reserve/restore).
        let (inventory_actor, inventory_client) = InventoryActor::new(capacity);
        let inventory_handle = tokio::spawn(inventory_actor.run());

        // 2. Shipper registry (generic resource actor).
        let shipper_id_counter = Arc::new(AtomicU64::new(1));
        let next_shipper_id = move || {
            let id = shipper_id_counter.fetch_add(1, Ordering::SeqCst);
            format!("shipper_{id}")
        };
        let (shipper_actor, shipper_resource_client) =
            ResourceActor::<Shipper>::new(capacity, next_shipper_id);
        let shipper_client = ShipperClient::new(shipper_resource_client);
        let shipper_handle = tokio::spawn(shipper_actor.run());

        // 3. Order store plus its orchestrating client.
        let (order_actor, order_sender) = OrderActor::new(capacity);
        let order_client = OrderClient::new(
            order_sender,
            inventory_client.clone(),
            shipper_client.clone(),
            notifier,
        );
        let order_handle = tokio::spawn(order_actor.run());

        Self {
            inventory_client,
            order_client,
            shipper_client,
            handles: vec![inventory_handle, shipper_handle, order_handle],
        }
    }

    /// Drops the clients, which closes the mailboxes, then waits for every
    /// actor to drain and stop.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.inventory_client);
        drop(self.order_client);
        drop(self.shipper_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {e:?}"));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
