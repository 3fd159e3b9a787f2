//! Shared application state handed to every HTTP handler.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::{AccessTokenRepository, CatalogQuery};
use crate::domain::{AccountService, BasketService, ImportService};

/// Services and ports the handlers depend on.
///
/// Cloning is cheap: every field is an [`Arc`].
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub imports: Arc<ImportService>,
    pub baskets: Arc<BasketService>,
    pub catalog: Arc<dyn CatalogQuery>,
    pub access_tokens: Arc<dyn AccessTokenRepository>,
    /// Location of the supplier price list picked up by `POST /partner/update`.
    pub pricelist_path: PathBuf,
}

impl HttpState {
    pub fn new(
        accounts: Arc<AccountService>,
        imports: Arc<ImportService>,
        baskets: Arc<BasketService>,
        catalog: Arc<dyn CatalogQuery>,
        access_tokens: Arc<dyn AccessTokenRepository>,
        pricelist_path: PathBuf,
    ) -> Self {
        Self {
            accounts,
            imports,
            baskets,
            catalog,
            access_tokens,
            pricelist_path,
        }
    }
}
