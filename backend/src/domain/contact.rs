//! Delivery contacts attached to placed orders.

use serde::{Deserialize, Serialize};

/// A stored contact, as returned to the owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Contact {
    pub id: i64,
    pub city: String,
    pub street: String,
    pub house: String,
    pub structure: String,
    pub building: String,
    pub apartment: String,
    pub phone: String,
}

/// Contact fields supplied when placing an order.
///
/// City, street, house and phone are required; the finer address parts
/// default to empty strings so the whole tuple can be deduplicated in
/// storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub struct ContactDraft {
    pub city: String,
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub apartment: String,
    pub phone: String,
}

impl ContactDraft {
    /// Names of required fields that are empty once trimmed.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.street.trim().is_empty() {
            missing.push("street");
        }
        if self.house.trim().is_empty() {
            missing.push("house");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        missing
    }
}
