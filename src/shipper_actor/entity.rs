use super::{ShipperAction, ShipperActionResult};
use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Shipper, ShipperCreate, ShipperPatch};

impl Entity for Shipper {
    type Id = String;
    type CreateParams = ShipperCreate;
    type Patch = ShipperPatch;
    type Action = ShipperAction;
    type ActionResult = ShipperActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: ShipperCreate) -> Result<Self, FrameworkError> {
        if params.name.trim().is_empty() {
            return Err(FrameworkError::Rejected(
                "shipper name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            name: params.name,
            verified: false,
        })
    }

    fn on_update(&mut self, patch: ShipperPatch) -> Result<(), FrameworkError> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(FrameworkError::Rejected(
                    "shipper name must not be empty".to_string(),
                ));
            }
            self.name = name;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ShipperAction) -> Result<ShipperActionResult, FrameworkError> {
        match action {
            ShipperAction::Verify => {
                let changed = !self.verified;
                self.verified = true;
                Ok(ShipperActionResult::Verified(changed))
            }
            ShipperAction::Revoke => {
                let changed = self.verified;
                self.verified = false;
                Ok(ShipperActionResult::Revoked(changed))
            }
        }
    }
}
