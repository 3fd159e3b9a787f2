//! Write-side port for supplier price-list imports.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::pricelist::{ImportSummary, PriceList};
use crate::domain::user::UserId;

/// Errors raised by catalog ingestion adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIngestionError {
    /// Repository connection could not be established.
    #[error("catalog ingestion connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution; the surrounding
    /// transaction rolled back.
    #[error("catalog ingestion failed: {message}")]
    Query { message: String },
    /// The shop named in the document belongs to a different supplier.
    #[error("shop {name:?} is managed by another account")]
    ShopOwnedByAnother { name: String },
}

impl CatalogIngestionError {
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

    pub fn shop_owned_by_another(name: impl Into<String>) -> Self {
        Self::ShopOwnedByAnother { name: name.into() }
    }
}

impl From<CatalogIngestionError> for Error {
    fn from(err: CatalogIngestionError) -> Self {
        match err {
            CatalogIngestionError::Connection { .. } => {
                Error::service_unavailable("storage is unavailable")
            }
            CatalogIngestionError::ShopOwnedByAnother { .. } => Error::conflict(err.to_string()),
            CatalogIngestionError::Query { .. } => Error::internal("import failed"),
        }
    }
}

#[async_trait]
pub trait CatalogIngestion: Send + Sync {
    /// Replace the shop's catalog with the document's contents.
    ///
    /// Runs as one transaction: get-or-create the shop for `owner`, refresh
    /// its category associations, drop its old offers and insert the new
    /// ones. A failure leaves the previous catalog intact.
    async fn replace_shop_catalog(
        &self,
        owner: UserId,
        document: &PriceList,
    ) -> Result<ImportSummary, CatalogIngestionError>;
}

/// Fixture ingestion that reports an empty import.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogIngestion;

#[async_trait]
impl CatalogIngestion for FixtureCatalogIngestion {
    async fn replace_shop_catalog(
        &self,
        _owner: UserId,
        _document: &PriceList,
    ) -> Result<ImportSummary, CatalogIngestionError> {
        Ok(ImportSummary::default())
    }
}
