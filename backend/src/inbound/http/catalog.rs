//! Catalog read endpoints.
//!
//! ```text
//! GET /api/v1/categories      List all categories
//! GET /api/v1/shops           List active shops
//! GET /api/v1/products        Search offers (optional shop_id, category_id)
//! GET /api/v1/products/{id}   Offers for one product
//! ```
//!
//! All endpoints are public and return bare JSON arrays; an empty catalog
//! yields an empty list, never an error.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::domain::catalog::OfferFilter;
use crate::domain::ApiResult;

use super::state::HttpState;

/// Query parameters accepted by the offer search.
#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
pub struct OfferSearchQuery {
    /// Restrict results to one shop.
    pub shop_id: Option<i32>,
    /// Restrict results to one category.
    pub category_id: Option<i32>,
}

/// List every known category.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "All categories", body = [crate::domain::catalog::CategorySummary]),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["catalog"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn categories(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let categories = state.catalog.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// List shops currently accepting orders.
#[utoipa::path(
    get,
    path = "/api/v1/shops",
    responses(
        (status = 200, description = "Active shops", body = [crate::domain::catalog::ShopSummary]),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["catalog"],
    operation_id = "listShops"
)]
#[get("/shops")]
pub async fn shops(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let shops = state.catalog.shops().await?;
    Ok(HttpResponse::Ok().json(shops))
}

/// Search offers across active shops.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(OfferSearchQuery),
    responses(
        (status = 200, description = "Matching offers", body = [crate::domain::catalog::OfferView]),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["catalog"],
    operation_id = "searchOffers"
)]
#[get("/products")]
pub async fn search_offers(
    state: web::Data<HttpState>,
    query: web::Query<OfferSearchQuery>,
) -> ApiResult<HttpResponse> {
    let filter = OfferFilter {
        shop_id: query.shop_id,
        category_id: query.category_id,
        product_id: None,
    };
    let offers = state.catalog.search_offers(filter).await?;
    Ok(HttpResponse::Ok().json(offers))
}

/// List the offers of a single product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Offers for the product", body = [crate::domain::catalog::OfferView]),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["catalog"],
    operation_id = "productOffers"
)]
#[get("/products/{id}")]
pub async fn product_offers(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let offers = state
        .catalog
        .search_offers(OfferFilter::by_product(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(offers))
}
