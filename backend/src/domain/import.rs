//! Supplier price-list import service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::error::Error;
use crate::domain::ports::CatalogIngestion;
use crate::domain::pricelist::{ImportSummary, PriceList};
use crate::domain::user::UserId;
use crate::domain::ApiResult;

/// Validates a price-list document and hands it to the ingestion port.
pub struct ImportService {
    ingestion: Arc<dyn CatalogIngestion>,
}

impl ImportService {
    pub fn new(ingestion: Arc<dyn CatalogIngestion>) -> Self {
        Self { ingestion }
    }

    /// Run one import for the supplier owning the request.
    ///
    /// The document is validated up front; a rejected document never reaches
    /// storage. The ingestion adapter runs the replace inside a single
    /// transaction, so a mid-import failure leaves the previous catalog
    /// intact.
    pub async fn import(&self, owner: UserId, document: &PriceList) -> ApiResult<ImportSummary> {
        if let Err(violations) = document.validate() {
            let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
            return Err(Error::invalid_request("price list failed validation")
                .with_details(json!({ "price_list": messages })));
        }

        let summary = self.ingestion.replace_shop_catalog(owner, document).await?;
        tracing::info!(
            shop = %document.shop,
            categories = summary.categories,
            products = summary.products,
            "price list imported"
        );
        Ok(summary)
    }
}
