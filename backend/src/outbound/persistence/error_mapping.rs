//! Shared Diesel/pool error mapping for the persistence adapters.
//!
//! Every port error distinguishes connection failures from query failures;
//! the [`StorageError`] trait lets the adapters share one mapping.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Implemented by port error enums with `Connection`/`Query` variants.
pub trait StorageError: Sized {
    fn connection(message: impl Into<String>) -> Self;
    fn query(message: impl Into<String>) -> Self;
}

macro_rules! impl_storage_error {
    ($($ty:ty),* $(,)?) => {
        $(impl StorageError for $ty {
            fn connection(message: impl Into<String>) -> Self {
                Self::connection(message)
            }

            fn query(message: impl Into<String>) -> Self {
                Self::query(message)
            }
        })*
    };
}

impl_storage_error!(
    crate::domain::ports::CatalogIngestionError,
    crate::domain::ports::CatalogQueryError,
    crate::domain::ports::ContactRepositoryError,
    crate::domain::ports::OrderRepositoryError,
    crate::domain::ports::TokenRepositoryError,
    crate::domain::ports::UserRepositoryError,
);

/// Map a pool failure to the port's connection error.
pub fn map_pool_error<E: StorageError>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => E::connection(message),
    }
}

/// Map a Diesel failure to the port's error, logging the cause at debug.
pub fn map_diesel_error<E: StorageError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => E::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error")
        }
        _ => E::query("database error"),
    }
}

/// Whether the error is a unique violation on the named constraint.
pub fn is_unique_violation_on(error: &DieselError, constraint: &str) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(constraint)
    )
}
