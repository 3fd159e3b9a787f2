//! Catalog read models.
//!
//! These types shape the responses of the read API. They are produced by the
//! persistence adapter (which does the joins and eager loading) and returned
//! to clients unchanged.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// A product category, `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategorySummary {
    /// Supplier-assigned category identifier.
    pub id: i32,
    pub name: String,
}

/// An active shop, `{id, name, active}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShopSummary {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

/// Product identity embedded in an offer listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub category: CategorySummary,
}

/// A shop-specific product listing with its attribute map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OfferView {
    pub id: i64,
    pub external_id: i64,
    pub model: String,
    pub product: ProductRef,
    pub shop: ShopSummary,
    pub price: i64,
    pub price_rrc: i64,
    pub quantity: i32,
    /// Parameter name to value, sorted for stable output.
    pub parameters: BTreeMap<String, String>,
}

/// Filters accepted by the offer search.
///
/// All filters are optional and combine conjunctively. Only offers from
/// active shops are ever returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferFilter {
    pub shop_id: Option<i32>,
    pub category_id: Option<i32>,
    pub product_id: Option<i64>,
}

impl OfferFilter {
    /// Filter that selects every offer of one product.
    pub fn by_product(product_id: i64) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }
}
