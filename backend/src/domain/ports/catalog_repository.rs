//! Read-side port over the catalog: categories, shops and offer search.

use async_trait::async_trait;

use crate::domain::catalog::{CategorySummary, OfferFilter, OfferView, ShopSummary};
use crate::domain::error::Error;

/// Errors raised by catalog query adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogQueryError {
    /// Repository connection could not be established.
    #[error("catalog repository connection failed: {message}")]
    Connection { message: String },
    /// Query failed during execution.
    #[error("catalog repository query failed: {message}")]
    Query { message: String },
}

impl CatalogQueryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<CatalogQueryError> for Error {
    fn from(err: CatalogQueryError) -> Self {
        match err {
            CatalogQueryError::Connection { .. } => {
                Error::service_unavailable("storage is unavailable")
            }
            CatalogQueryError::Query { .. } => Error::internal("storage query failed"),
        }
    }
}

/// Read-only catalog access. Empty results are empty lists, never errors.
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// All categories, ordered by id.
    async fn categories(&self) -> Result<Vec<CategorySummary>, CatalogQueryError>;

    /// Active shops only.
    async fn shops(&self) -> Result<Vec<ShopSummary>, CatalogQueryError>;

    /// Offers from active shops matching the filter, with product, shop and
    /// parameter data attached.
    async fn search_offers(&self, filter: OfferFilter)
        -> Result<Vec<OfferView>, CatalogQueryError>;
}

/// Fixture catalog with nothing in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogQuery;

#[async_trait]
impl CatalogQuery for FixtureCatalogQuery {
    async fn categories(&self) -> Result<Vec<CategorySummary>, CatalogQueryError> {
        Ok(Vec::new())
    }

    async fn shops(&self) -> Result<Vec<ShopSummary>, CatalogQueryError> {
        Ok(Vec::new())
    }

    async fn search_offers(
        &self,
        _filter: OfferFilter,
    ) -> Result<Vec<OfferView>, CatalogQueryError> {
        Ok(Vec::new())
    }
}
