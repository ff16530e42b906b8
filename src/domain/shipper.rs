use serde::Serialize;

/// A delivery person. Only verified shippers are eligible for assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipper {
    pub id: String,
    pub name: String,
    pub verified: bool,
}

/// Payload for registering a shipper. New shippers start unverified.
#[derive(Debug, Clone)]
pub struct ShipperCreate {
    pub name: String,
}

/// Partial update of a shipper's profile.
#[derive(Debug, Clone, Default)]
pub struct ShipperPatch {
    pub name: Option<String>,
}
