use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Shipper, ShipperCreate, ShipperPatch};
use crate::error::ShipperError;
use crate::impl_basic_client;
use crate::shipper_actor::{ShipperAction, ShipperActionResult};

/// Client for the shipper registry.
#[derive(Clone)]
pub struct ShipperClient {
    inner: ResourceClient<Shipper>,
}

impl_basic_client!(ShipperClient, Shipper, ShipperError, shipper);

impl ShipperClient {
    #[instrument(skip(self))]
    pub async fn register_shipper(&self, params: ShipperCreate) -> Result<String, ShipperError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(ShipperError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_shipper(
        &self,
        id: String,
        patch: ShipperPatch,
    ) -> Result<Shipper, ShipperError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(ShipperError::from)
    }

    /// Marks a shipper verified; returns whether the flag actually changed.
    #[instrument(skip(self))]
    pub async fn verify_shipper(&self, id: String) -> Result<bool, ShipperError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ShipperAction::Verify).await {
            Ok(ShipperActionResult::Verified(changed)) => Ok(changed),
            Ok(other) => Err(ShipperError::ActorCommunication(format!(
                "unexpected action result: {other:?}"
            ))),
            Err(e) => Err(ShipperError::from(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn revoke_shipper(&self, id: String) -> Result<bool, ShipperError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ShipperAction::Revoke).await {
            Ok(ShipperActionResult::Revoked(changed)) => Ok(changed),
            Ok(other) => Err(ShipperError::ActorCommunication(format!(
                "unexpected action result: {other:?}"
            ))),
            Err(e) => Err(ShipperError::from(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_shippers(&self) -> Result<Vec<Shipper>, ShipperError> {
        debug!("Sending request");
        self.inner.list().await.map_err(ShipperError::from)
    }

    /// The assignment-eligible set: verified shippers only.
    #[instrument(skip(self))]
    pub async fn list_verified(&self) -> Result<Vec<Shipper>, ShipperError> {
        let all = self.list_shippers().await?;
        Ok(all.into_iter().filter(|s| s.verified).collect())
    }
}
