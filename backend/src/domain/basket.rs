//! Basket and order engine: views, request payloads and the service that
//! drives the order lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::catalog::OfferView;
use crate::domain::contact::ContactDraft;
use crate::domain::error::Error;
use crate::domain::notification::Notification;
use crate::domain::ports::{
    ContactRepository, LineInsertOutcome, LineRejection, NotificationQueue, OrderRepository,
    RejectedLine,
};
use crate::domain::user::AuthUser;
use crate::domain::ApiResult;

/// Lifecycle states an order moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Basket,
    New,
    Confirmed,
    Assembled,
    Sent,
    Delivered,
    Canceled,
}

impl OrderState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basket => "basket",
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::Assembled => "assembled",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basket" => Some(Self::Basket),
            "new" => Some(Self::New),
            "confirmed" => Some(Self::Confirmed),
            "assembled" => Some(Self::Assembled),
            "sent" => Some(Self::Sent),
            "delivered" => Some(Self::Delivered),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// One line of an order, joined with its offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct LineView {
    pub id: i64,
    pub quantity: i32,
    pub offer: OfferView,
}

/// A user's basket: the single order in state `basket`, with lines and total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct BasketView {
    pub id: i64,
    pub state: OrderState,
    pub lines: Vec<LineView>,
    /// Sum of `quantity * price` over all lines.
    pub total: i64,
}

impl BasketView {
    /// An empty basket rendering for users who never added a line.
    pub fn empty() -> Self {
        Self {
            id: 0,
            state: OrderState::Basket,
            lines: Vec::new(),
            total: 0,
        }
    }

    pub fn compute_total(lines: &[LineView]) -> i64 {
        lines
            .iter()
            .map(|line| i64::from(line.quantity) * line.offer.price)
            .sum()
    }
}

/// A placed order as returned by the order listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct OrderView {
    pub id: i64,
    pub state: OrderState,
    pub created_at: DateTime<Utc>,
    pub contact_id: Option<i64>,
    pub lines: Vec<LineView>,
    pub total: i64,
}

/// A requested basket line: offer reference plus desired quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub struct NewOrderLine {
    /// Offer id, named for the wire field used by clients.
    pub product_info: i64,
    pub quantity: i32,
}

/// A quantity change for an existing basket line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
pub struct QuantityUpdate {
    /// Line id within the basket.
    pub id: i64,
    pub quantity: i32,
}

/// Parse a comma-separated id list, keeping only well-formed numeric ids.
///
/// Non-numeric entries and blanks are skipped silently; deleting with junk
/// ids simply removes nothing for those entries.
pub fn parse_id_list(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

/// Orchestrates the order, contact and notification ports.
pub struct BasketService {
    orders: Arc<dyn OrderRepository>,
    contacts: Arc<dyn ContactRepository>,
    queue: Arc<dyn NotificationQueue>,
}

impl BasketService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        contacts: Arc<dyn ContactRepository>,
        queue: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            orders,
            contacts,
            queue,
        }
    }

    /// The user's basket, rendered empty when none exists yet.
    pub async fn basket(&self, user: &AuthUser) -> ApiResult<BasketView> {
        let basket = self.orders.basket(user.id).await?;
        Ok(basket.unwrap_or_else(BasketView::empty))
    }

    /// Add lines to the basket.
    ///
    /// Non-positive quantities are rejected locally; the rest go to storage,
    /// which reports unknown offers and duplicate lines per item. The batch
    /// itself never fails on a bad line.
    pub async fn add(
        &self,
        user: &AuthUser,
        lines: Vec<NewOrderLine>,
    ) -> ApiResult<LineInsertOutcome> {
        let (valid, invalid): (Vec<_>, Vec<_>) =
            lines.into_iter().partition(|line| line.quantity > 0);

        let mut outcome = if valid.is_empty() {
            LineInsertOutcome::default()
        } else {
            self.orders.add_lines(user.id, &valid).await?
        };
        outcome.rejected.extend(invalid.into_iter().map(|line| RejectedLine {
            offer_id: line.product_info,
            reason: LineRejection::InvalidQuantity,
        }));
        Ok(outcome)
    }

    /// Apply quantity updates to basket lines.
    ///
    /// Every submitted quantity must be a positive integer; otherwise the
    /// whole batch is rejected before storage is touched. Returns the number
    /// of lines actually updated.
    pub async fn update(&self, user: &AuthUser, updates: &[QuantityUpdate]) -> ApiResult<usize> {
        let offending: Vec<i64> = updates
            .iter()
            .filter(|u| u.quantity <= 0)
            .map(|u| u.id)
            .collect();
        if !offending.is_empty() {
            return Err(Error::invalid_request("quantity must be a positive integer")
                .with_details(json!({ "items": offending })));
        }
        Ok(self.orders.update_quantities(user.id, updates).await?)
    }

    /// Delete basket lines by id. Returns the number of lines removed.
    pub async fn remove(&self, user: &AuthUser, line_ids: &[i64]) -> ApiResult<usize> {
        if line_ids.is_empty() {
            return Ok(0);
        }
        Ok(self.orders.remove_lines(user.id, line_ids).await?)
    }

    /// Turn the basket into a placed order.
    ///
    /// Resolves the contact first, then moves the order scoped to
    /// (user, basket state). A miss means the id was not this user's basket.
    /// On success an order-placed notification is enqueued; dispatch
    /// failures are logged and never surfaced.
    pub async fn place(
        &self,
        user: &AuthUser,
        order_id: i64,
        contact: &ContactDraft,
    ) -> ApiResult<()> {
        let missing = contact.missing_fields();
        if !missing.is_empty() {
            return Err(
                Error::invalid_request("missing arguments").with_details(json!({
                    "missing": missing,
                })),
            );
        }

        let contact_id = self.contacts.get_or_create(user.id, contact).await?;
        let moved = self.orders.place(user.id, order_id, contact_id).await?;
        if !moved {
            return Err(Error::not_found("basket order not found"));
        }

        let event = Notification::OrderPlaced {
            email: user.email.to_string(),
            order_id,
        };
        if let Err(err) = self.queue.enqueue(event).await {
            tracing::warn!(order_id, error = %err, "order notification was not enqueued");
        }
        Ok(())
    }

    /// The user's placed orders, newest first.
    pub async fn orders(&self, user: &AuthUser) -> ApiResult<Vec<OrderView>> {
        Ok(self.orders.placed_orders(user.id).await?)
    }
}
