/// Custom actions for shipper entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipperAction {
    /// Marks the shipper as verified, making them eligible for assignment.
    Verify,
    /// Revokes verification; the shipper stops receiving new assignments.
    Revoke,
}

/// Results from shipper actions - variants match 1:1 with [`ShipperAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShipperActionResult {
    /// Whether the verify actually changed the flag.
    Verified(bool),
    /// Whether the revoke actually changed the flag.
    Revoked(bool),
}
