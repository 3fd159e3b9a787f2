//! Supplier price-list import endpoint.
//!
//! ```text
//! POST /api/v1/partner/update   Replace the caller's shop catalog
//! ```
//!
//! The price list is read from a path configured at startup, matching the
//! deployment where suppliers drop their export next to the service. Only
//! `shop` accounts may trigger an import.

use actix_web::{post, web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::domain::pricelist::PriceList;
use crate::domain::user::AccountType;
use crate::domain::{ApiResult, Error};

use super::auth::Authenticated;
use super::state::HttpState;

/// Trigger a catalog import from the configured price-list file.
#[utoipa::path(
    post,
    path = "/api/v1/partner/update",
    responses(
        (status = 200, description = "Import summary with category and product counts"),
        (status = 400, description = "Malformed or invalid price list", body = crate::domain::Error),
        (status = 403, description = "Login required or not a shop account", body = crate::domain::Error),
        (status = 409, description = "Shop name owned by another supplier", body = crate::domain::Error),
        (status = 503, description = "Price list file or storage unavailable", body = crate::domain::Error)
    ),
    tags = ["partner"],
    operation_id = "updatePriceList"
)]
#[post("/partner/update")]
pub async fn update(state: web::Data<HttpState>, caller: Authenticated) -> ApiResult<HttpResponse> {
    let user = caller.user();
    if user.account_type != AccountType::Shop {
        return Err(Error::forbidden("only shop accounts can update price lists"));
    }

    let raw = tokio::fs::read(&state.pricelist_path).await.map_err(|err| {
        warn!(path = %state.pricelist_path.display(), error = %err, "price list file unreadable");
        Error::service_unavailable("price list file is unavailable")
    })?;
    let document: PriceList = serde_json::from_slice(&raw).map_err(|err| {
        Error::invalid_request("malformed price list document")
            .with_details(json!({ "price_list": [err.to_string()] }))
    })?;

    let summary = state.imports.import(user.id, &document).await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": true,
        "categories": summary.categories,
        "products": summary.products,
    })))
}
