//! Domain ports: async trait seams between the core and its adapters.
//!
//! One port per file, each with its `thiserror` error enum and a fixture
//! implementation for tests that do not exercise the port.

pub mod catalog_ingestion;
pub mod catalog_repository;
pub mod contact_repository;
pub mod notification_queue;
pub mod order_repository;
pub mod password_hasher;
pub mod password_policy;
pub mod token_repository;
pub mod user_repository;

pub use catalog_ingestion::{CatalogIngestion, CatalogIngestionError, FixtureCatalogIngestion};
pub use catalog_repository::{CatalogQuery, CatalogQueryError, FixtureCatalogQuery};
pub use contact_repository::{ContactRepository, ContactRepositoryError, FixtureContactRepository};
pub use notification_queue::{
    FixtureNotificationQueue, NotificationQueue, NotificationQueueError,
};
pub use order_repository::{
    FixtureOrderRepository, LineInsertOutcome, LineRejection, OrderRepository,
    OrderRepositoryError, RejectedLine,
};
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
pub use password_policy::{DefaultPasswordPolicy, PasswordPolicy};
pub use token_repository::{
    AccessTokenRepository, ConfirmationTokenRepository, FixtureAccessTokenRepository,
    FixtureConfirmationTokenRepository, TokenRepositoryError,
};
pub use user_repository::{
    FixtureUserRepository, NewUser, StoredCredentials, UserRepository, UserRepositoryError,
};
