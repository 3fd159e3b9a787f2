//! Shared fixtures for handler tests.
//!
//! Builds an [`HttpState`] over in-memory ports so handler tests exercise
//! routing, extraction and the response envelope without a database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::catalog::{
    CategorySummary, OfferFilter, OfferView, ProductRef, ShopSummary,
};
use crate::domain::ports::{
    AccessTokenRepository, CatalogIngestion, CatalogIngestionError, CatalogQuery,
    CatalogQueryError, DefaultPasswordPolicy, FixtureCatalogQuery,
    FixtureConfirmationTokenRepository, FixtureContactRepository, FixtureNotificationQueue,
    FixtureOrderRepository, FixturePasswordHasher, FixtureUserRepository, TokenRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::pricelist::{ImportSummary, PriceList};
use crate::domain::user::{
    AccountType, AuthUser, EmailAddress, Profile, ProfileUpdate, UserId,
};
use crate::domain::{AccountService, BasketService, ImportService};

use super::routes;
use super::state::HttpState;

/// Token store holding a fixed set of resolutions.
#[derive(Debug, Default)]
pub struct TestAccessTokens {
    users: HashMap<Uuid, AuthUser>,
}

impl TestAccessTokens {
    pub fn single(token: Uuid, user: AuthUser) -> Self {
        Self {
            users: HashMap::from([(token, user)]),
        }
    }
}

#[async_trait]
impl AccessTokenRepository for TestAccessTokens {
    async fn issue(&self, _user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        Ok(Uuid::new_v4())
    }

    async fn resolve(&self, token: Uuid) -> Result<Option<AuthUser>, TokenRepositoryError> {
        Ok(self.users.get(&token).cloned())
    }
}

/// In-memory catalog with conjunctive filter semantics.
#[derive(Debug, Default)]
pub struct TestCatalog {
    pub categories: Vec<CategorySummary>,
    pub shops: Vec<ShopSummary>,
    pub offers: Vec<OfferView>,
}

impl TestCatalog {
    /// Two offers in two shops, enough to exercise the filters.
    pub fn with_sample_offers() -> Self {
        let phones = CategorySummary {
            id: 224,
            name: "Phones".into(),
        };
        let offer = |id: i64, shop_id: i32, shop_name: &str| OfferView {
            id,
            external_id: id * 100,
            model: format!("model-{id}"),
            product: ProductRef {
                id,
                name: format!("product {id}"),
                category: phones.clone(),
            },
            shop: ShopSummary {
                id: shop_id,
                name: shop_name.into(),
                active: true,
            },
            price: 1000 * id,
            price_rrc: 1100 * id,
            quantity: 3,
            parameters: Default::default(),
        };
        Self {
            categories: vec![phones.clone()],
            shops: vec![
                ShopSummary {
                    id: 1,
                    name: "Svyaznoy".into(),
                    active: true,
                },
                ShopSummary {
                    id: 2,
                    name: "Euroset".into(),
                    active: true,
                },
            ],
            offers: vec![offer(1, 1, "Svyaznoy"), offer(2, 2, "Euroset")],
        }
    }
}

#[async_trait]
impl CatalogQuery for TestCatalog {
    async fn categories(&self) -> Result<Vec<CategorySummary>, CatalogQueryError> {
        Ok(self.categories.clone())
    }

    async fn shops(&self) -> Result<Vec<ShopSummary>, CatalogQueryError> {
        Ok(self.shops.clone())
    }

    async fn search_offers(
        &self,
        filter: OfferFilter,
    ) -> Result<Vec<OfferView>, CatalogQueryError> {
        Ok(self
            .offers
            .iter()
            .filter(|offer| {
                filter.shop_id.is_none_or(|id| offer.shop.id == id)
                    && filter
                        .category_id
                        .is_none_or(|id| offer.product.category.id == id)
                    && filter.product_id.is_none_or(|id| offer.product.id == id)
            })
            .cloned()
            .collect())
    }
}

/// Ingestion stub that reports the document's own counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingIngestion;

#[async_trait]
impl CatalogIngestion for CountingIngestion {
    async fn replace_shop_catalog(
        &self,
        _owner: UserId,
        document: &PriceList,
    ) -> Result<ImportSummary, CatalogIngestionError> {
        Ok(ImportSummary {
            categories: document.categories.len(),
            products: document.goods.len(),
        })
    }
}

/// User repository serving exactly one stored profile.
#[derive(Debug, Clone)]
pub struct SingleProfileRepository {
    profile: Profile,
}

#[async_trait]
impl UserRepository for SingleProfileRepository {
    async fn insert(
        &self,
        _user: crate::domain::ports::NewUser,
    ) -> Result<UserId, UserRepositoryError> {
        Ok(self.profile.id)
    }

    async fn find_credentials_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<crate::domain::ports::StoredCredentials>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_active_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<UserId>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, UserRepositoryError> {
        Ok((id == self.profile.id).then(|| self.profile.clone()))
    }

    async fn activate(&self, _id: UserId) -> Result<bool, UserRepositoryError> {
        Ok(true)
    }

    async fn update_profile(
        &self,
        _id: UserId,
        _update: ProfileUpdate,
        _new_password_hash: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}

fn stored_user(username: &str, account_type: AccountType) -> (AuthUser, Profile) {
    let id = UserId::random();
    let email = EmailAddress::new(format!("{username}@example.com")).expect("fixture email");
    let auth = AuthUser {
        id,
        email: email.clone(),
        account_type,
    };
    let profile = Profile {
        id,
        username: username.into(),
        first_name: "Test".into(),
        last_name: "User".into(),
        email,
        company: "Acme".into(),
        position: "tester".into(),
        account_type,
    };
    (auth, profile)
}

/// Assembles an [`HttpState`] from in-memory ports.
pub struct StateBuilder {
    catalog: Arc<dyn CatalogQuery>,
    access_tokens: Arc<dyn AccessTokenRepository>,
    users: Arc<dyn UserRepository>,
    pricelist_path: PathBuf,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(FixtureCatalogQuery),
            access_tokens: Arc::new(TestAccessTokens::default()),
            users: Arc::new(FixtureUserRepository),
            pricelist_path: PathBuf::from("/nonexistent/pricelist.json"),
        }
    }

    pub fn with_catalog(mut self, catalog: TestCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_pricelist_path(mut self, path: impl AsRef<Path>) -> Self {
        self.pricelist_path = path.as_ref().to_path_buf();
        self
    }

    /// Register a logged-in buyer and return their token.
    pub fn with_authenticated_buyer(self) -> (Self, Uuid) {
        self.with_authenticated_user("buyer", AccountType::Buyer)
    }

    /// Register a logged-in shop account and return its token.
    pub fn with_authenticated_shop(self) -> (Self, Uuid) {
        self.with_authenticated_user("shopkeeper", AccountType::Shop)
    }

    fn with_authenticated_user(mut self, username: &str, kind: AccountType) -> (Self, Uuid) {
        let (auth, profile) = stored_user(username, kind);
        let token = Uuid::new_v4();
        self.access_tokens = Arc::new(TestAccessTokens::single(token, auth));
        self.users = Arc::new(SingleProfileRepository { profile });
        (self, token)
    }

    pub fn build(self) -> HttpState {
        let queue = Arc::new(FixtureNotificationQueue);
        let accounts = AccountService::new(
            self.users,
            Arc::new(FixtureConfirmationTokenRepository),
            self.access_tokens.clone(),
            Arc::new(FixturePasswordHasher),
            Arc::new(DefaultPasswordPolicy),
            queue.clone(),
        );
        let imports = ImportService::new(Arc::new(CountingIngestion));
        let baskets = BasketService::new(
            Arc::new(FixtureOrderRepository),
            Arc::new(FixtureContactRepository),
            queue,
        );
        HttpState::new(
            Arc::new(accounts),
            Arc::new(imports),
            Arc::new(baskets),
            self.catalog,
            self.access_tokens,
            self.pricelist_path,
        )
    }

    pub fn into_app(
        self,
    ) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        actix_web::App::new()
            .app_data(actix_web::web::Data::new(self.build()))
            .configure(routes::configure)
    }
}

/// App over fixture ports only: no tokens resolve, the catalog is empty.
pub fn fixture_app() -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    StateBuilder::new().into_app()
}
