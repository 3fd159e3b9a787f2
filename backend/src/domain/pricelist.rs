//! Supplier price-list document.
//!
//! The import endpoint reads this document from a configured path and hands
//! it to the import service. Fields are typed up front; a document that does
//! not match the schema is rejected before any database work happens.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// A category entry in a price list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceListCategory {
    pub id: i32,
    pub name: String,
}

/// A single good offered by the supplier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceListGood {
    /// Supplier's own identifier for the offer.
    pub id: i64,
    pub name: String,
    /// Reference to a category id listed in the same document.
    pub category: i32,
    pub model: String,
    pub price: i64,
    pub price_rrc: i64,
    pub quantity: i32,
    /// Free-form attribute map; values may be strings or scalars.
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

/// The whole price-list document `{shop, categories, goods}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceList {
    pub shop: String,
    #[serde(default)]
    pub categories: Vec<PriceListCategory>,
    #[serde(default)]
    pub goods: Vec<PriceListGood>,
}

/// Validation failures raised before an import touches the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceListValidationError {
    /// The shop name is empty once trimmed.
    #[error("price list has no shop name")]
    EmptyShopName,
    /// A good references a category id missing from `categories`.
    #[error("good {good_id} references unknown category {category_id}")]
    UnknownCategory { good_id: i64, category_id: i32 },
    /// A good carries a negative price or quantity.
    #[error("good {good_id} has a negative {field}")]
    NegativeValue { good_id: i64, field: &'static str },
    /// A parameter value is a JSON array or object.
    #[error("good {good_id} parameter {name:?} is not a scalar")]
    NonScalarParameter { good_id: i64, name: String },
}

impl PriceList {
    /// Check internal consistency of the document.
    ///
    /// Returns every violation rather than the first one so a supplier can
    /// fix a broken export in one round trip.
    pub fn validate(&self) -> Result<(), Vec<PriceListValidationError>> {
        let mut violations = Vec::new();

        if self.shop.trim().is_empty() {
            violations.push(PriceListValidationError::EmptyShopName);
        }

        let known: BTreeSet<i32> = self.categories.iter().map(|c| c.id).collect();
        for good in &self.goods {
            if !known.contains(&good.category) {
                violations.push(PriceListValidationError::UnknownCategory {
                    good_id: good.id,
                    category_id: good.category,
                });
            }
            if good.price < 0 {
                violations.push(PriceListValidationError::NegativeValue {
                    good_id: good.id,
                    field: "price",
                });
            }
            if good.price_rrc < 0 {
                violations.push(PriceListValidationError::NegativeValue {
                    good_id: good.id,
                    field: "price_rrc",
                });
            }
            if good.quantity < 0 {
                violations.push(PriceListValidationError::NegativeValue {
                    good_id: good.id,
                    field: "quantity",
                });
            }
            for (name, value) in &good.parameters {
                if value.is_array() || value.is_object() {
                    violations.push(PriceListValidationError::NonScalarParameter {
                        good_id: good.id,
                        name: name.clone(),
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Render a scalar parameter value as the stored string form.
///
/// Strings keep their content, other scalars keep their JSON rendering
/// (`42`, `4.5`, `true`).
pub fn parameter_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Counts reported by a completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct ImportSummary {
    /// Categories upserted from the document.
    pub categories: usize,
    /// Offers created for the shop.
    pub products: usize,
}
