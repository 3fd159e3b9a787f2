//! In-memory adapters backing the HTTP contract tests.
//!
//! Each adapter implements a domain port over a mutex-guarded map, close
//! enough to the PostgreSQL semantics that the contract suite can drive
//! whole user journeys through the real handlers and services.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use storefront::domain::basket::{
    BasketView, LineView, NewOrderLine, OrderState, OrderView, QuantityUpdate,
};
use storefront::domain::catalog::{
    CategorySummary, OfferFilter, OfferView, ProductRef, ShopSummary,
};
use storefront::domain::contact::ContactDraft;
use storefront::domain::notification::Notification;
use storefront::domain::ports::{
    AccessTokenRepository, CatalogIngestion, CatalogIngestionError, CatalogQuery,
    CatalogQueryError, ConfirmationTokenRepository, ContactRepository, ContactRepositoryError,
    DefaultPasswordPolicy, FixturePasswordHasher, LineInsertOutcome, LineRejection, NewUser,
    NotificationQueue, NotificationQueueError, OrderRepository, OrderRepositoryError,
    RejectedLine, StoredCredentials, TokenRepositoryError, UserRepository, UserRepositoryError,
};
use storefront::domain::pricelist::{parameter_value_to_string, PriceList};
use storefront::domain::user::{AccountType, AuthUser, EmailAddress, Profile, ProfileUpdate, UserId};
use storefront::domain::{AccountService, BasketService, ImportService};
use storefront::inbound::http::{routes, HttpState};

#[derive(Debug, Clone)]
struct UserRecord {
    id: UserId,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    company: String,
    position: String,
    account_type: AccountType,
    is_active: bool,
}

/// Users table.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<UserRecord>>,
}

impl InMemoryUsers {
    pub fn active_count(&self) -> usize {
        self.rows
            .lock()
            .expect("users lock")
            .iter()
            .filter(|row| row.is_active)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.rows.lock().expect("users lock").len()
    }

    /// Id of the account with the given email; panics when absent.
    pub fn id_by_email(&self, email: &str) -> UserId {
        self.rows
            .lock()
            .expect("users lock")
            .iter()
            .find(|row| row.email == email)
            .map(|row| row.id)
            .expect("no such user")
    }

    pub fn is_active(&self, username: &str) -> Option<bool> {
        self.rows
            .lock()
            .expect("users lock")
            .iter()
            .find(|row| row.username == username)
            .map(|row| row.is_active)
    }

    fn auth_user(&self, id: UserId) -> Option<AuthUser> {
        self.rows
            .lock()
            .expect("users lock")
            .iter()
            .find(|row| row.id == id && row.is_active)
            .map(|row| AuthUser {
                id: row.id,
                email: EmailAddress::new(row.email.clone()).expect("stored email"),
                account_type: row.account_type,
            })
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: NewUser) -> Result<UserId, UserRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        if rows.iter().any(|row| row.email == user.email) {
            return Err(UserRepositoryError::DuplicateEmail);
        }
        if rows.iter().any(|row| row.username == user.username) {
            return Err(UserRepositoryError::DuplicateUsername);
        }
        let id = UserId::random();
        rows.push(UserRecord {
            id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            company: user.company,
            position: user.position,
            account_type: user.account_type,
            is_active: false,
        });
        Ok(id)
    }

    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("users lock")
            .iter()
            .find(|row| row.username == username)
            .map(|row| StoredCredentials {
                id: row.id,
                email: row.email.clone(),
                password_hash: row.password_hash.clone(),
                account_type: row.account_type,
                is_active: row.is_active,
            }))
    }

    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserId>, UserRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("users lock")
            .iter()
            .find(|row| row.email == email && row.is_active)
            .map(|row| row.id))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, UserRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("users lock")
            .iter()
            .find(|row| row.id == id)
            .map(|row| Profile {
                id: row.id,
                username: row.username.clone(),
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
                email: EmailAddress::new(row.email.clone()).expect("stored email"),
                company: row.company.clone(),
                position: row.position.clone(),
                account_type: row.account_type,
            }))
    }

    async fn activate(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.is_active = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
        new_password_hash: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        let mut rows = self.rows.lock().expect("users lock");
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Err(UserRepositoryError::query("no such user"));
        };
        if let Some(first_name) = update.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            row.last_name = last_name;
        }
        if let Some(email) = update.email {
            row.email = email.to_string();
        }
        if let Some(company) = update.company {
            row.company = company;
        }
        if let Some(position) = update.position {
            row.position = position;
        }
        if let Some(hash) = new_password_hash {
            row.password_hash = hash;
        }
        Ok(())
    }
}

/// Confirmation tokens keyed by value.
#[derive(Debug)]
pub struct InMemoryConfirmations {
    users: Arc<InMemoryUsers>,
    tokens: Mutex<HashMap<Uuid, UserId>>,
}

impl InMemoryConfirmations {
    pub fn new(users: Arc<InMemoryUsers>) -> Self {
        Self {
            users,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.tokens.lock().expect("tokens lock").len()
    }
}

#[async_trait]
impl ConfirmationTokenRepository for InMemoryConfirmations {
    async fn create(&self, user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        let token = Uuid::new_v4();
        self.tokens
            .lock()
            .expect("tokens lock")
            .insert(token, user_id);
        Ok(token)
    }

    async fn consume(
        &self,
        email: &str,
        token: Uuid,
    ) -> Result<Option<UserId>, TokenRepositoryError> {
        let mut tokens = self.tokens.lock().expect("tokens lock");
        let Some(owner) = tokens.get(&token).copied() else {
            return Ok(None);
        };
        let matches = {
            let rows = self.users.rows.lock().expect("users lock");
            rows.iter().any(|row| row.id == owner && row.email == email)
        };
        if !matches {
            return Ok(None);
        }
        tokens.remove(&token);
        Ok(Some(owner))
    }
}

/// Access tokens resolving through the user table.
#[derive(Debug)]
pub struct InMemoryAccessTokens {
    users: Arc<InMemoryUsers>,
    tokens: Mutex<HashMap<UserId, Uuid>>,
}

impl InMemoryAccessTokens {
    pub fn new(users: Arc<InMemoryUsers>) -> Self {
        Self {
            users,
            tokens: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryAccessTokens {
    async fn issue(&self, user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        let mut tokens = self.tokens.lock().expect("tokens lock");
        Ok(*tokens.entry(user_id).or_insert_with(Uuid::new_v4))
    }

    async fn resolve(&self, token: Uuid) -> Result<Option<AuthUser>, TokenRepositoryError> {
        let owner = {
            let tokens = self.tokens.lock().expect("tokens lock");
            tokens
                .iter()
                .find(|(_, value)| **value == token)
                .map(|(user, _)| *user)
        };
        Ok(owner.and_then(|id| self.users.auth_user(id)))
    }
}

#[derive(Debug, Clone)]
struct OfferRecord {
    id: i64,
    external_id: i64,
    model: String,
    product_name: String,
    category_id: i32,
    shop: String,
    price: i64,
    price_rrc: i64,
    quantity: i32,
    parameters: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: BTreeMap<i32, String>,
    shop_owners: BTreeMap<String, UserId>,
    offers: Vec<OfferRecord>,
    next_offer_id: i64,
}

/// Catalog store shared by the read side, the ingestion side and the order
/// engine (which needs offer existence and prices).
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn offer_ids_for_shop(&self, shop: &str) -> Vec<i64> {
        self.state
            .lock()
            .expect("catalog lock")
            .offers
            .iter()
            .filter(|offer| offer.shop == shop)
            .map(|offer| offer.id)
            .collect()
    }

    fn shop_summary_for(name: &str, index: usize) -> ShopSummary {
        ShopSummary {
            id: i32::try_from(index).unwrap_or(i32::MAX) + 1,
            name: name.to_owned(),
            active: true,
        }
    }

    fn view(state: &CatalogState, offer: &OfferRecord) -> OfferView {
        let shop_index = state
            .shop_owners
            .keys()
            .position(|name| name == &offer.shop)
            .unwrap_or_default();
        OfferView {
            id: offer.id,
            external_id: offer.external_id,
            model: offer.model.clone(),
            product: ProductRef {
                id: offer.external_id,
                name: offer.product_name.clone(),
                category: CategorySummary {
                    id: offer.category_id,
                    name: state
                        .categories
                        .get(&offer.category_id)
                        .cloned()
                        .unwrap_or_default(),
                },
            },
            shop: Self::shop_summary_for(&offer.shop, shop_index),
            price: offer.price,
            price_rrc: offer.price_rrc,
            quantity: offer.quantity,
            parameters: offer.parameters.clone(),
        }
    }

    fn offer_view(&self, offer_id: i64) -> Option<OfferView> {
        let state = self.state.lock().expect("catalog lock");
        state
            .offers
            .iter()
            .find(|offer| offer.id == offer_id)
            .map(|offer| Self::view(&state, offer))
    }

    fn offer_exists(&self, offer_id: i64) -> bool {
        self.state
            .lock()
            .expect("catalog lock")
            .offers
            .iter()
            .any(|offer| offer.id == offer_id)
    }
}

#[async_trait]
impl CatalogQuery for InMemoryCatalog {
    async fn categories(&self) -> Result<Vec<CategorySummary>, CatalogQueryError> {
        Ok(self
            .state
            .lock()
            .expect("catalog lock")
            .categories
            .iter()
            .map(|(id, name)| CategorySummary {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn shops(&self) -> Result<Vec<ShopSummary>, CatalogQueryError> {
        let state = self.state.lock().expect("catalog lock");
        Ok(state
            .shop_owners
            .keys()
            .enumerate()
            .map(|(index, name)| Self::shop_summary_for(name, index))
            .collect())
    }

    async fn search_offers(
        &self,
        filter: OfferFilter,
    ) -> Result<Vec<OfferView>, CatalogQueryError> {
        let state = self.state.lock().expect("catalog lock");
        Ok(state
            .offers
            .iter()
            .map(|offer| Self::view(&state, offer))
            .filter(|view| {
                filter.shop_id.is_none_or(|id| view.shop.id == id)
                    && filter
                        .category_id
                        .is_none_or(|id| view.product.category.id == id)
                    && filter.product_id.is_none_or(|id| view.product.id == id)
            })
            .collect())
    }
}

#[async_trait]
impl CatalogIngestion for InMemoryCatalog {
    async fn replace_shop_catalog(
        &self,
        owner: UserId,
        document: &PriceList,
    ) -> Result<storefront::domain::pricelist::ImportSummary, CatalogIngestionError> {
        let mut state = self.state.lock().expect("catalog lock");
        match state.shop_owners.get(&document.shop) {
            Some(existing) if *existing != owner => {
                return Err(CatalogIngestionError::shop_owned_by_another(&document.shop));
            }
            _ => {
                state.shop_owners.insert(document.shop.clone(), owner);
            }
        }
        for category in &document.categories {
            state.categories.insert(category.id, category.name.clone());
        }
        state.offers.retain(|offer| offer.shop != document.shop);
        for good in &document.goods {
            state.next_offer_id += 1;
            let id = state.next_offer_id;
            state.offers.push(OfferRecord {
                id,
                external_id: good.id,
                model: good.model.clone(),
                product_name: good.name.clone(),
                category_id: good.category,
                shop: document.shop.clone(),
                price: good.price,
                price_rrc: good.price_rrc,
                quantity: good.quantity,
                parameters: good
                    .parameters
                    .iter()
                    .map(|(name, value)| (name.clone(), parameter_value_to_string(value)))
                    .collect(),
            });
        }
        Ok(storefront::domain::pricelist::ImportSummary {
            categories: document.categories.len(),
            products: document.goods.len(),
        })
    }
}

#[derive(Debug, Clone)]
struct LineRecord {
    id: i64,
    offer_id: i64,
    quantity: i32,
}

#[derive(Debug, Clone)]
struct OrderRecord {
    id: i64,
    user: UserId,
    state: OrderState,
    contact_id: Option<i64>,
    created_at: chrono::DateTime<Utc>,
    lines: Vec<LineRecord>,
}

/// Orders and order lines, with the one-basket-per-user invariant enforced
/// the way the partial unique index does in PostgreSQL.
#[derive(Debug)]
pub struct InMemoryOrders {
    catalog: Arc<InMemoryCatalog>,
    orders: Mutex<Vec<OrderRecord>>,
    next_id: AtomicI64,
}

impl InMemoryOrders {
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            catalog,
            orders: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(0),
        }
    }

    pub fn basket_count(&self, user: UserId) -> usize {
        self.orders
            .lock()
            .expect("orders lock")
            .iter()
            .filter(|order| order.user == user && order.state == OrderState::Basket)
            .count()
    }

    fn next(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn line_views(&self, lines: &[LineRecord]) -> Vec<LineView> {
        lines
            .iter()
            .filter_map(|line| {
                self.catalog.offer_view(line.offer_id).map(|offer| LineView {
                    id: line.id,
                    quantity: line.quantity,
                    offer,
                })
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn basket(&self, user: UserId) -> Result<Option<BasketView>, OrderRepositoryError> {
        let record = {
            let orders = self.orders.lock().expect("orders lock");
            orders
                .iter()
                .find(|order| order.user == user && order.state == OrderState::Basket)
                .cloned()
        };
        Ok(record.map(|order| {
            let lines = self.line_views(&order.lines);
            let total = BasketView::compute_total(&lines);
            BasketView {
                id: order.id,
                state: order.state,
                lines,
                total,
            }
        }))
    }

    async fn add_lines(
        &self,
        user: UserId,
        lines: &[NewOrderLine],
    ) -> Result<LineInsertOutcome, OrderRepositoryError> {
        let mut outcome = LineInsertOutcome::default();
        let mut orders = self.orders.lock().expect("orders lock");
        let basket_index = match orders
            .iter()
            .position(|order| order.user == user && order.state == OrderState::Basket)
        {
            Some(index) => index,
            None => {
                let id = self.next();
                orders.push(OrderRecord {
                    id,
                    user,
                    state: OrderState::Basket,
                    contact_id: None,
                    created_at: Utc::now(),
                    lines: Vec::new(),
                });
                orders.len() - 1
            }
        };
        for line in lines {
            if !self.catalog.offer_exists(line.product_info) {
                outcome.rejected.push(RejectedLine {
                    offer_id: line.product_info,
                    reason: LineRejection::UnknownOffer,
                });
                continue;
            }
            let basket = &mut orders[basket_index];
            if basket
                .lines
                .iter()
                .any(|existing| existing.offer_id == line.product_info)
            {
                outcome.rejected.push(RejectedLine {
                    offer_id: line.product_info,
                    reason: LineRejection::DuplicateLine,
                });
                continue;
            }
            let line_id = self.next();
            basket.lines.push(LineRecord {
                id: line_id,
                offer_id: line.product_info,
                quantity: line.quantity,
            });
            outcome.created += 1;
        }
        Ok(outcome)
    }

    async fn update_quantities(
        &self,
        user: UserId,
        updates: &[QuantityUpdate],
    ) -> Result<usize, OrderRepositoryError> {
        let mut orders = self.orders.lock().expect("orders lock");
        let Some(basket) = orders
            .iter_mut()
            .find(|order| order.user == user && order.state == OrderState::Basket)
        else {
            return Ok(0);
        };
        let mut updated = 0;
        for update in updates {
            if let Some(line) = basket.lines.iter_mut().find(|line| line.id == update.id) {
                line.quantity = update.quantity;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn remove_lines(
        &self,
        user: UserId,
        line_ids: &[i64],
    ) -> Result<usize, OrderRepositoryError> {
        let mut orders = self.orders.lock().expect("orders lock");
        let Some(basket) = orders
            .iter_mut()
            .find(|order| order.user == user && order.state == OrderState::Basket)
        else {
            return Ok(0);
        };
        let before = basket.lines.len();
        basket.lines.retain(|line| !line_ids.contains(&line.id));
        Ok(before - basket.lines.len())
    }

    async fn place(
        &self,
        user: UserId,
        order_id: i64,
        contact_id: i64,
    ) -> Result<bool, OrderRepositoryError> {
        let mut orders = self.orders.lock().expect("orders lock");
        match orders.iter_mut().find(|order| {
            order.id == order_id && order.user == user && order.state == OrderState::Basket
        }) {
            Some(order) => {
                order.state = OrderState::New;
                order.contact_id = Some(contact_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn placed_orders(&self, user: UserId) -> Result<Vec<OrderView>, OrderRepositoryError> {
        let mut records: Vec<OrderRecord> = {
            let orders = self.orders.lock().expect("orders lock");
            orders
                .iter()
                .filter(|order| order.user == user && order.state != OrderState::Basket)
                .cloned()
                .collect()
        };
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records
            .into_iter()
            .map(|order| {
                let lines = self.line_views(&order.lines);
                let total = BasketView::compute_total(&lines);
                OrderView {
                    id: order.id,
                    state: order.state,
                    created_at: order.created_at,
                    contact_id: order.contact_id,
                    lines,
                    total,
                }
            })
            .collect())
    }
}

/// Contacts deduplicated on the full draft tuple.
#[derive(Debug, Default)]
pub struct InMemoryContacts {
    rows: Mutex<Vec<(i64, UserId, ContactDraft)>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ContactRepository for InMemoryContacts {
    async fn get_or_create(
        &self,
        user: UserId,
        draft: &ContactDraft,
    ) -> Result<i64, ContactRepositoryError> {
        let mut rows = self.rows.lock().expect("contacts lock");
        if let Some((id, _, _)) = rows
            .iter()
            .find(|(_, owner, existing)| *owner == user && existing == draft)
        {
            return Ok(*id);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.push((id, user, draft.clone()));
        Ok(id)
    }
}

/// Queue adapter that records every enqueued notification.
#[derive(Debug, Default)]
pub struct RecordingQueue {
    events: Mutex<Vec<Notification>>,
}

impl RecordingQueue {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("queue lock").clone()
    }
}

#[async_trait]
impl NotificationQueue for RecordingQueue {
    async fn enqueue(&self, event: Notification) -> Result<(), NotificationQueueError> {
        self.events.lock().expect("queue lock").push(event);
        Ok(())
    }
}

/// The whole backend over in-memory adapters.
pub struct World {
    pub users: Arc<InMemoryUsers>,
    pub confirmations: Arc<InMemoryConfirmations>,
    pub access_tokens: Arc<InMemoryAccessTokens>,
    pub catalog: Arc<InMemoryCatalog>,
    pub orders: Arc<InMemoryOrders>,
    pub contacts: Arc<InMemoryContacts>,
    pub queue: Arc<RecordingQueue>,
    pub state: HttpState,
}

impl World {
    pub fn new() -> Self {
        Self::with_pricelist_path("/nonexistent/pricelist.json")
    }

    pub fn with_pricelist_path(path: impl AsRef<Path>) -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let confirmations = Arc::new(InMemoryConfirmations::new(users.clone()));
        let access_tokens = Arc::new(InMemoryAccessTokens::new(users.clone()));
        let catalog = Arc::new(InMemoryCatalog::default());
        let orders = Arc::new(InMemoryOrders::new(catalog.clone()));
        let contacts = Arc::new(InMemoryContacts::default());
        let queue = Arc::new(RecordingQueue::default());

        let accounts = AccountService::new(
            users.clone(),
            confirmations.clone(),
            access_tokens.clone(),
            Arc::new(FixturePasswordHasher),
            Arc::new(DefaultPasswordPolicy),
            queue.clone(),
        );
        let imports = ImportService::new(catalog.clone());
        let baskets = BasketService::new(orders.clone(), contacts.clone(), queue.clone());

        let state = HttpState::new(
            Arc::new(accounts),
            Arc::new(imports),
            Arc::new(baskets),
            catalog.clone(),
            access_tokens.clone(),
            path.as_ref().to_path_buf(),
        );

        Self {
            users,
            confirmations,
            access_tokens,
            catalog,
            orders,
            contacts,
            queue,
            state,
        }
    }

    pub fn app(
        &self,
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
            .app_data(actix_web::web::Data::new(self.state.clone()))
            .configure(routes::configure)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
