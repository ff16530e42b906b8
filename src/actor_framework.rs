//! Generic resource actor framework.
//!
//! CRUD-shaped stores (currently the shipper registry) implement [`Entity`]
//! and get an actor plus a typed client for free. Stores whose operations
//! span multiple rows at once (the inventory ledger, the order store) use
//! bespoke request enums instead; see `src/actors/`.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Errors produced by the generic actor and its client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Trait that any domain entity must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Construct the full entity from a generated id and the create payload.
    fn from_create_params(id: Self::Id, params: Self::CreateParams)
        -> Result<Self, FrameworkError>;

    fn on_update(&mut self, patch: Self::Patch) -> Result<(), FrameworkError>;

    /// Handle a domain-specific action beyond plain CRUD.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, FrameworkError>;
}

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

/// Owns the entity map and serializes all access through its mailbox.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient { sender };
        (actor, client)
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let id = (self.next_id_fn)();
                    match T::from_create_params(id.clone(), params) {
                        Ok(item) => {
                            self.store.insert(id.clone(), item);
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let mut items: Vec<T> = self.store.values().cloned().collect();
                    items.sort_by(|a, b| a.id().cmp(b.id()));
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    patch,
                    respond_to,
                } => {
                    if let Some(item) = self.store.get_mut(&id) {
                        match item.on_update(patch) {
                            Ok(()) => {
                                let _ = respond_to.send(Ok(item.clone()));
                            }
                            Err(e) => {
                                let _ = respond_to.send(Err(e));
                            }
                        }
                    } else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    if self.store.remove(&id).is_some() {
                        let _ = respond_to.send(Ok(()));
                    } else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    if let Some(item) = self.store.get_mut(&id) {
                        let _ = respond_to.send(item.handle_action(action));
                    } else {
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }
    }
}

/// Cheap-to-clone handle for talking to a [`ResourceActor`].
#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Shipper, ShipperCreate, ShipperPatch};
    use crate::shipper_actor::{ShipperAction, ShipperActionResult};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn spawn_registry() -> ResourceClient<Shipper> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            format!("shipper_{id}")
        };
        let (actor, client) = ResourceActor::<Shipper>::new(8, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn create_then_verify_action() {
        let client = spawn_registry();

        let id = client
            .create(ShipperCreate {
                name: "Dana".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, "shipper_1");

        let shipper = client.get(id.clone()).await.unwrap().unwrap();
        assert!(!shipper.verified);

        let result = client
            .perform_action(id.clone(), ShipperAction::Verify)
            .await
            .unwrap();
        assert_eq!(result, ShipperActionResult::Verified(true));

        // A second verify is a no-op.
        let result = client
            .perform_action(id.clone(), ShipperAction::Verify)
            .await
            .unwrap();
        assert_eq!(result, ShipperActionResult::Verified(false));

        let shipper = client.get(id).await.unwrap().unwrap();
        assert!(shipper.verified);
    }

    #[tokio::test]
    async fn list_returns_sorted_by_id() {
        let client = spawn_registry();
        for name in ["Ana", "Ben", "Cal"] {
            client
                .create(ShipperCreate {
                    name: name.to_string(),
                })
                .await
                .unwrap();
        }

        let all = client.list().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["shipper_1", "shipper_2", "shipper_3"]);
    }

    #[tokio::test]
    async fn update_and_delete_missing_item_fail() {
        let client = spawn_registry();
        let err = client
            .update(
                "shipper_99".to_string(),
                ShipperPatch {
                    name: Some("X".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("shipper_99".to_string()));

        let err = client.delete("shipper_99".to_string()).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("shipper_99".to_string()));
    }
}
