//! PostgreSQL-backed `CatalogIngestion` via Diesel.
//!
//! The whole replace runs in one transaction so a mid-import failure leaves
//! the shop's previous catalog intact.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CatalogIngestion, CatalogIngestionError};
use crate::domain::pricelist::{parameter_value_to_string, ImportSummary, PriceList, PriceListGood};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    NewCategoryRow, NewOfferRow, NewParameterRow, NewProductParameterRow, NewProductRow,
    NewShopCategoryRow, NewShopRow,
};
use super::pool::DbPool;
use super::schema::{
    categories, parameters, product_offers, product_parameters, products, shop_categories, shops,
};

#[derive(Clone)]
pub struct DieselCatalogIngestionRepository {
    pool: DbPool,
}

impl DieselCatalogIngestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Lets the adapter's error ride through `AsyncConnection::transaction`.
impl From<diesel::result::Error> for CatalogIngestionError {
    fn from(error: diesel::result::Error) -> Self {
        map_diesel_error(error)
    }
}

/// Resolve the shop row for this import, claiming an unowned shop and
/// refusing one owned by a different supplier.
async fn resolve_shop(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    name: &str,
) -> Result<i32, CatalogIngestionError> {
    let existing: Option<(i32, Option<Uuid>)> = shops::table
        .filter(shops::name.eq(name))
        .select((shops::id, shops::user_id))
        .first(conn)
        .await
        .optional()?;

    match existing {
        Some((_, Some(other))) if other != owner => {
            Err(CatalogIngestionError::shop_owned_by_another(name))
        }
        Some((id, Some(_))) => Ok(id),
        Some((id, None)) => {
            diesel::update(shops::table.filter(shops::id.eq(id)))
                .set(shops::user_id.eq(owner))
                .execute(conn)
                .await?;
            Ok(id)
        }
        None => {
            let id = diesel::insert_into(shops::table)
                .values(&NewShopRow {
                    name,
                    user_id: Some(owner),
                    active: true,
                })
                .returning(shops::id)
                .get_result(conn)
                .await?;
            Ok(id)
        }
    }
}

async fn get_or_create_product(
    conn: &mut AsyncPgConnection,
    name: &str,
    category_id: i32,
) -> Result<i64, diesel::result::Error> {
    let inserted: Option<i64> = diesel::insert_into(products::table)
        .values(&NewProductRow { name, category_id })
        .on_conflict((products::name, products::category_id))
        .do_nothing()
        .returning(products::id)
        .get_result(conn)
        .await
        .optional()?;
    if let Some(id) = inserted {
        return Ok(id);
    }
    products::table
        .filter(products::name.eq(name))
        .filter(products::category_id.eq(category_id))
        .select(products::id)
        .first(conn)
        .await
}

async fn get_or_create_parameter(
    conn: &mut AsyncPgConnection,
    name: &str,
) -> Result<i32, diesel::result::Error> {
    let inserted: Option<i32> = diesel::insert_into(parameters::table)
        .values(&NewParameterRow { name })
        .on_conflict(parameters::name)
        .do_nothing()
        .returning(parameters::id)
        .get_result(conn)
        .await
        .optional()?;
    if let Some(id) = inserted {
        return Ok(id);
    }
    parameters::table
        .filter(parameters::name.eq(name))
        .select(parameters::id)
        .first(conn)
        .await
}

async fn insert_good(
    conn: &mut AsyncPgConnection,
    shop_id: i32,
    good: &PriceListGood,
) -> Result<(), diesel::result::Error> {
    let product_id = get_or_create_product(conn, &good.name, good.category).await?;

    let offer_id: i64 = diesel::insert_into(product_offers::table)
        .values(&NewOfferRow {
            external_id: good.id,
            model: &good.model,
            price: good.price,
            price_rrc: good.price_rrc,
            quantity: good.quantity,
            shop_id,
            product_id,
        })
        .returning(product_offers::id)
        .get_result(conn)
        .await?;

    for (name, value) in &good.parameters {
        let parameter_id = get_or_create_parameter(conn, name).await?;
        let value = parameter_value_to_string(value);
        diesel::insert_into(product_parameters::table)
            .values(&NewProductParameterRow {
                offer_id,
                parameter_id,
                value: &value,
            })
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl CatalogIngestion for DieselCatalogIngestionRepository {
    async fn replace_shop_catalog(
        &self,
        owner: UserId,
        document: &PriceList,
    ) -> Result<ImportSummary, CatalogIngestionError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_pool_error::<CatalogIngestionError>)?;
        let owner = *owner.as_uuid();

        conn.transaction(|conn| {
            async move {
                let shop_id = resolve_shop(conn, owner, document.shop.trim()).await?;

                // Refresh the shop's category associations.
                diesel::delete(
                    shop_categories::table.filter(shop_categories::shop_id.eq(shop_id)),
                )
                .execute(conn)
                .await?;
                for category in &document.categories {
                    diesel::insert_into(categories::table)
                        .values(&NewCategoryRow {
                            id: category.id,
                            name: &category.name,
                        })
                        .on_conflict(categories::id)
                        .do_update()
                        .set(categories::name.eq(excluded(categories::name)))
                        .execute(conn)
                        .await?;
                    diesel::insert_into(shop_categories::table)
                        .values(&NewShopCategoryRow {
                            shop_id,
                            category_id: category.id,
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }

                // Old offers go wholesale; parameters follow via cascade.
                diesel::delete(
                    product_offers::table.filter(product_offers::shop_id.eq(shop_id)),
                )
                .execute(conn)
                .await?;

                for good in &document.goods {
                    insert_good(conn, shop_id, good).await?;
                }

                Ok(ImportSummary {
                    categories: document.categories.len(),
                    products: document.goods.len(),
                })
            }
            .scope_boxed()
        })
        .await
    }
}
