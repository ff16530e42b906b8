//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Instead of spinning up a real actor, tests create a "mock client" whose
//! mailbox they hold the receiving end of. The test then inspects the
//! messages arriving on that channel, asserts they are correct, and answers
//! them by hand, simulating the actor's behavior (success, failure, delays)
//! deterministically.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::InventoryClient;
use crate::domain::{Order, OrderCreate, OrderLineItem, OrderLineRequest, OrderStatus};
use crate::error::{InventoryError, OrderError};
use crate::messages::{InventoryRequest, OrderStoreRequest, ServiceResponse};
use crate::notify::{NotificationSender, NotifyError};

/// Creates a mock resource client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Creates a mock inventory client and a receiver for asserting requests.
pub fn create_mock_inventory(
    buffer_size: usize,
) -> (InventoryClient, mpsc::Receiver<InventoryRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (InventoryClient::new(sender), receiver)
}

/// Creates a mock order-store mailbox pair.
pub fn create_mock_order_store(
    buffer_size: usize,
) -> (
    mpsc::Sender<OrderStoreRequest>,
    mpsc::Receiver<OrderStoreRequest>,
) {
    mpsc::channel(buffer_size)
}

/// Helper to verify that the next message is a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::CreateParams,
    oneshot::Sender<Result<T::Id, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next inventory message is a Reserve batch.
pub async fn expect_reserve(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(
    Vec<OrderLineRequest>,
    ServiceResponse<Vec<OrderLineItem>, InventoryError>,
)> {
    match receiver.recv().await {
        Some(InventoryRequest::Reserve { lines, respond_to }) => Some((lines, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next inventory message is a Restore batch.
pub async fn expect_restore(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(Vec<OrderLineRequest>, ServiceResponse<(), InventoryError>)> {
    match receiver.recv().await {
        Some(InventoryRequest::Restore { lines, respond_to }) => Some((lines, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next order-store message is an Insert.
pub async fn expect_insert(
    receiver: &mut mpsc::Receiver<OrderStoreRequest>,
) -> Option<(OrderCreate, ServiceResponse<Order, OrderError>)> {
    match receiver.recv().await {
        Some(OrderStoreRequest::Insert { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next order-store message is a Cancel.
pub async fn expect_cancel(
    receiver: &mut mpsc::Receiver<OrderStoreRequest>,
) -> Option<(
    String,
    String,
    ServiceResponse<(Order, OrderStatus), OrderError>,
)> {
    match receiver.recv().await {
        Some(OrderStoreRequest::Cancel {
            id,
            requesting_user_id,
            respond_to,
        }) => Some((id, requesting_user_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next order-store message is a Reinstate.
pub async fn expect_reinstate(
    receiver: &mut mpsc::Receiver<OrderStoreRequest>,
) -> Option<(String, OrderStatus, ServiceResponse<Order, OrderError>)> {
    match receiver.recv().await {
        Some(OrderStoreRequest::Reinstate {
            id,
            status,
            respond_to,
        }) => Some((id, status, respond_to)),
        _ => None,
    }
}

/// Notifier that records every order it is handed, for asserting the
/// fire-and-forget path.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    placed: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn placed_order_ids(&self) -> Vec<String> {
        self.placed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn order_placed(&self, order: &Order) -> Result<(), NotifyError> {
        self.placed.lock().unwrap().push(order.id.clone());
        Ok(())
    }
}

/// Notifier whose transport always fails.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl NotificationSender for FailingNotifier {
    async fn order_placed(&self, _order: &Order) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay unreachable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ShipperClient;
    use crate::domain::{Shipper, ShipperCreate};
    use crate::shipper_actor::{ShipperAction, ShipperActionResult};

    #[tokio::test]
    async fn mock_resource_client_round_trip() {
        let (inner, mut receiver) = create_mock_client::<Shipper>(8);
        let client = ShipperClient::new(inner);

        let server = tokio::spawn(async move {
            let (params, respond_to) = expect_create(&mut receiver).await.expect("Expected Create");
            assert_eq!(params.name, "Dana");
            respond_to.send(Ok("shipper_1".to_string())).unwrap();

            let (id, action, respond_to) =
                expect_action(&mut receiver).await.expect("Expected Action");
            assert_eq!(id, "shipper_1");
            assert_eq!(action, ShipperAction::Verify);
            respond_to
                .send(Ok(ShipperActionResult::Verified(true)))
                .unwrap();

            let (id, respond_to) = expect_get(&mut receiver).await.expect("Expected Get");
            assert_eq!(id, "shipper_1");
            respond_to.send(Ok(None)).unwrap();

            let respond_to = expect_list(&mut receiver).await.expect("Expected List");
            respond_to.send(Ok(vec![])).unwrap();
        });

        let id = client
            .register_shipper(ShipperCreate {
                name: "Dana".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, "shipper_1");
        assert!(client.verify_shipper(id.clone()).await.unwrap());
        assert_eq!(client.get_shipper(id).await.unwrap(), None);
        assert!(client.list_shippers().await.unwrap().is_empty());

        server.await.unwrap();
    }
}
