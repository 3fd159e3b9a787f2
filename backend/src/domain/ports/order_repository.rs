//! Port for baskets and placed orders.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::basket::{BasketView, NewOrderLine, OrderView, QuantityUpdate};
use crate::domain::error::Error;
use crate::domain::user::UserId;

/// Errors raised by order repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRepositoryError {
    /// Repository connection could not be established.
    #[error("order repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("order repository query failed: {message}")]
    Query { message: String },
}

impl OrderRepositoryError {
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

impl From<OrderRepositoryError> for Error {
    fn from(err: OrderRepositoryError) -> Self {
        match err {
            OrderRepositoryError::Connection { .. } => {
                Error::service_unavailable("storage is unavailable")
            }
            OrderRepositoryError::Query { .. } => Error::internal("storage query failed"),
        }
    }
}

/// Why a single submitted line was not inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LineRejection {
    /// No offer with that id exists.
    UnknownOffer,
    /// The basket already holds a line for that offer.
    DuplicateLine,
    /// Quantity was zero or negative.
    InvalidQuantity,
}

/// A line that was not inserted, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct RejectedLine {
    pub offer_id: i64,
    pub reason: LineRejection,
}

/// Per-batch outcome of adding lines to the basket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct LineInsertOutcome {
    /// Lines actually inserted.
    pub created: usize,
    /// One entry per rejected line.
    pub rejected: Vec<RejectedLine>,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// The user's basket with lines and totals, if one exists.
    async fn basket(&self, user: UserId) -> Result<Option<BasketView>, OrderRepositoryError>;

    /// Insert lines into the user's basket, creating the basket if needed.
    ///
    /// Integrity failures are collected per line and never abort the batch.
    async fn add_lines(
        &self,
        user: UserId,
        lines: &[NewOrderLine],
    ) -> Result<LineInsertOutcome, OrderRepositoryError>;

    /// Apply quantity updates scoped to the user's basket. Unmatched line
    /// ids are skipped. Returns the number of rows updated.
    async fn update_quantities(
        &self,
        user: UserId,
        updates: &[QuantityUpdate],
    ) -> Result<usize, OrderRepositoryError>;

    /// Delete basket lines by id, scoped to the user's basket. Returns the
    /// number of rows deleted.
    async fn remove_lines(&self, user: UserId, line_ids: &[i64])
        -> Result<usize, OrderRepositoryError>;

    /// Move order `order_id` from `basket` to `new`, attaching the contact.
    ///
    /// The update is scoped to (user, basket state); returns whether a row
    /// matched.
    async fn place(
        &self,
        user: UserId,
        order_id: i64,
        contact_id: i64,
    ) -> Result<bool, OrderRepositoryError>;

    /// The user's non-basket orders, newest first, with lines and totals.
    async fn placed_orders(&self, user: UserId) -> Result<Vec<OrderView>, OrderRepositoryError>;
}

/// Fixture repository with no orders in it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn basket(&self, _user: UserId) -> Result<Option<BasketView>, OrderRepositoryError> {
        Ok(None)
    }

    async fn add_lines(
        &self,
        _user: UserId,
        lines: &[NewOrderLine],
    ) -> Result<LineInsertOutcome, OrderRepositoryError> {
        Ok(LineInsertOutcome {
            created: lines.len(),
            rejected: Vec::new(),
        })
    }

    async fn update_quantities(
        &self,
        _user: UserId,
        _updates: &[QuantityUpdate],
    ) -> Result<usize, OrderRepositoryError> {
        Ok(0)
    }

    async fn remove_lines(
        &self,
        _user: UserId,
        _line_ids: &[i64],
    ) -> Result<usize, OrderRepositoryError> {
        Ok(0)
    }

    async fn place(
        &self,
        _user: UserId,
        _order_id: i64,
        _contact_id: i64,
    ) -> Result<bool, OrderRepositoryError> {
        Ok(false)
    }

    async fn placed_orders(&self, _user: UserId) -> Result<Vec<OrderView>, OrderRepositoryError> {
        Ok(Vec::new())
    }
}
