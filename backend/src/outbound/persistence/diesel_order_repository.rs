//! PostgreSQL-backed `OrderRepository` via Diesel.
//!
//! The one-basket-per-user invariant lives in the `one_basket_per_user`
//! partial unique index; this adapter only has to lose insert races
//! gracefully.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::basket::{BasketView, LineView, NewOrderLine, OrderState, OrderView, QuantityUpdate};
use crate::domain::catalog::OfferView;
use crate::domain::ports::{
    LineInsertOutcome, LineRejection, OrderRepository, OrderRepositoryError, RejectedLine,
};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewOrderItemRow, NewOrderRow};
use super::offer_views::{attach_parameters, join_row_to_view, OfferJoinRow};
use super::pool::DbPool;
use super::schema::{categories, order_items, orders, product_offers, products, shops};

const BASKET: &str = "basket";
const NEW: &str = "new";

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn basket_id(
    conn: &mut AsyncPgConnection,
    user: Uuid,
) -> Result<Option<i64>, diesel::result::Error> {
    orders::table
        .filter(orders::user_id.eq(user))
        .filter(orders::state.eq(BASKET))
        .select(orders::id)
        .first(conn)
        .await
        .optional()
}

/// Get-or-create the basket order, deferring uniqueness to the partial
/// index.
async fn ensure_basket(
    conn: &mut AsyncPgConnection,
    user: Uuid,
) -> Result<i64, diesel::result::Error> {
    if let Some(id) = basket_id(conn, user).await? {
        return Ok(id);
    }

    let inserted: Option<i64> = diesel::insert_into(orders::table)
        .values(&NewOrderRow {
            user_id: user,
            state: BASKET,
        })
        .on_conflict(orders::user_id)
        .filter_target(orders::state.eq(BASKET))
        .do_nothing()
        .returning(orders::id)
        .get_result(conn)
        .await
        .optional()?;
    match inserted {
        Some(id) => Ok(id),
        // Lost the race; the concurrent winner's basket is ours too.
        None => {
            orders::table
                .filter(orders::user_id.eq(user))
                .filter(orders::state.eq(BASKET))
                .select(orders::id)
                .first(conn)
                .await
        }
    }
}

/// Load an order's lines, offers fully rendered.
async fn load_lines(
    conn: &mut AsyncPgConnection,
    order_id: i64,
) -> Result<Vec<LineView>, diesel::result::Error> {
    let rows: Vec<(i64, i32, OfferJoinRow)> = order_items::table
        .inner_join(
            product_offers::table
                .inner_join(shops::table)
                .inner_join(products::table.inner_join(categories::table)),
        )
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::id.asc())
        .select((
            order_items::id,
            order_items::quantity,
            (
                product_offers::id,
                product_offers::external_id,
                product_offers::model,
                product_offers::price,
                product_offers::price_rrc,
                product_offers::quantity,
                products::id,
                products::name,
                categories::id,
                categories::name,
                shops::id,
                shops::name,
                shops::active,
            ),
        ))
        .load(conn)
        .await?;

    let mut metas = Vec::with_capacity(rows.len());
    let mut offers: Vec<OfferView> = Vec::with_capacity(rows.len());
    for (line_id, quantity, join) in rows {
        metas.push((line_id, quantity));
        offers.push(join_row_to_view(join));
    }
    attach_parameters(conn, &mut offers).await?;

    Ok(metas
        .into_iter()
        .zip(offers)
        .map(|((id, quantity), offer)| LineView {
            id,
            quantity,
            offer,
        })
        .collect())
}

fn parse_state(raw: &str, order_id: i64) -> OrderState {
    OrderState::parse(raw).unwrap_or_else(|| {
        tracing::warn!(value = raw, order_id, "unrecognised order state, rendering as new");
        OrderState::New
    })
}

fn classify_insert_failure(error: &DieselError) -> Option<LineRejection> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Some(LineRejection::UnknownOffer)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            Some(LineRejection::DuplicateLine)
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            Some(LineRejection::InvalidQuantity)
        }
        _ => None,
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn basket(&self, user: UserId) -> Result<Option<BasketView>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(order_id) = basket_id(&mut conn, *user.as_uuid())
            .await
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };

        let lines = load_lines(&mut conn, order_id)
            .await
            .map_err(map_diesel_error)?;
        let total = BasketView::compute_total(&lines);
        Ok(Some(BasketView {
            id: order_id,
            state: OrderState::Basket,
            lines,
            total,
        }))
    }

    async fn add_lines(
        &self,
        user: UserId,
        lines: &[NewOrderLine],
    ) -> Result<LineInsertOutcome, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id = ensure_basket(&mut conn, *user.as_uuid())
            .await
            .map_err(map_diesel_error)?;

        let mut outcome = LineInsertOutcome::default();
        for line in lines {
            let result = diesel::insert_into(order_items::table)
                .values(&NewOrderItemRow {
                    order_id,
                    offer_id: line.product_info,
                    quantity: line.quantity,
                })
                .execute(&mut conn)
                .await;
            match result {
                Ok(_) => outcome.created += 1,
                Err(err) => match classify_insert_failure(&err) {
                    Some(reason) => outcome.rejected.push(RejectedLine {
                        offer_id: line.product_info,
                        reason,
                    }),
                    None => return Err(map_diesel_error(err)),
                },
            }
        }
        Ok(outcome)
    }

    async fn update_quantities(
        &self,
        user: UserId,
        updates: &[QuantityUpdate],
    ) -> Result<usize, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(order_id) = basket_id(&mut conn, *user.as_uuid())
            .await
            .map_err(map_diesel_error)?
        else {
            return Ok(0);
        };

        let mut updated = 0;
        for update in updates {
            updated += diesel::update(
                order_items::table
                    .filter(order_items::id.eq(update.id))
                    .filter(order_items::order_id.eq(order_id)),
            )
            .set(order_items::quantity.eq(update.quantity))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        }
        Ok(updated)
    }

    async fn remove_lines(
        &self,
        user: UserId,
        line_ids: &[i64],
    ) -> Result<usize, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let Some(order_id) = basket_id(&mut conn, *user.as_uuid())
            .await
            .map_err(map_diesel_error)?
        else {
            return Ok(0);
        };

        diesel::delete(
            order_items::table
                .filter(order_items::order_id.eq(order_id))
                .filter(order_items::id.eq_any(line_ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn place(
        &self,
        user: UserId,
        order_id: i64,
        contact_id: i64,
    ) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::user_id.eq(user.as_uuid()))
                .filter(orders::state.eq(BASKET)),
        )
        .set((orders::state.eq(NEW), orders::contact_id.eq(contact_id)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn placed_orders(&self, user: UserId) -> Result<Vec<OrderView>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let heads: Vec<(i64, String, Option<i64>, DateTime<Utc>)> = orders::table
            .filter(orders::user_id.eq(user.as_uuid()))
            .filter(orders::state.ne(BASKET))
            .order(orders::created_at.desc())
            .select((
                orders::id,
                orders::state,
                orders::contact_id,
                orders::created_at,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut views = Vec::with_capacity(heads.len());
        for (id, state, contact_id, created_at) in heads {
            let lines = load_lines(&mut conn, id).await.map_err(map_diesel_error)?;
            let total = BasketView::compute_total(&lines);
            views.push(OrderView {
                id,
                state: parse_state(&state, id),
                created_at,
                contact_id,
                lines,
                total,
            });
        }
        Ok(views)
    }
}
