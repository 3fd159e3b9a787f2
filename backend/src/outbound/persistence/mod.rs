//! Diesel/PostgreSQL adapters for the domain's storage ports.

pub mod pool;
pub mod schema;

mod diesel_catalog_ingestion_repository;
mod diesel_catalog_repository;
mod diesel_contact_repository;
mod diesel_order_repository;
mod diesel_token_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod offer_views;

pub use diesel_catalog_ingestion_repository::DieselCatalogIngestionRepository;
pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_token_repository::{DieselAccessTokenRepository, DieselConfirmationTokenRepository};
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
