//! PostgreSQL-backed `CatalogQuery` via Diesel.
//!
//! The offer search joins offers with their shop, product and category in
//! one query, then attaches parameters with a second query over the matched
//! offer ids.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::catalog::{CategorySummary, OfferFilter, OfferView, ShopSummary};
use crate::domain::ports::{CatalogQuery, CatalogQueryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::offer_views::{attach_parameters, join_row_to_view, OfferJoinRow};
use super::pool::DbPool;
use super::schema::{categories, product_offers, products, shops};

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogQuery for DieselCatalogRepository {
    async fn categories(&self) -> Result<Vec<CategorySummary>, CatalogQueryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, String)> = categories::table
            .order(categories::id.asc())
            .select((categories::id, categories::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CategorySummary { id, name })
            .collect())
    }

    async fn shops(&self) -> Result<Vec<ShopSummary>, CatalogQueryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, String, bool)> = shops::table
            .filter(shops::active.eq(true))
            .order(shops::id.asc())
            .select((shops::id, shops::name, shops::active))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, active)| ShopSummary { id, name, active })
            .collect())
    }

    async fn search_offers(
        &self,
        filter: OfferFilter,
    ) -> Result<Vec<OfferView>, CatalogQueryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = product_offers::table
            .inner_join(shops::table)
            .inner_join(products::table.inner_join(categories::table))
            .filter(shops::active.eq(true))
            .into_boxed();
        if let Some(shop_id) = filter.shop_id {
            query = query.filter(product_offers::shop_id.eq(shop_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(products::category_id.eq(category_id));
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(product_offers::product_id.eq(product_id));
        }

        let rows: Vec<OfferJoinRow> = query
            .order(product_offers::id.asc())
            .distinct()
            .select((
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
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut views: Vec<OfferView> = rows.into_iter().map(join_row_to_view).collect();
        attach_parameters(&mut conn, &mut views)
            .await
            .map_err(map_diesel_error)?;
        Ok(views)
    }
}
