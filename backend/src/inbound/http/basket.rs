//! Basket endpoints.
//!
//! ```text
//! GET    /api/v1/basket   Read the basket
//! POST   /api/v1/basket   Add lines
//! PUT    /api/v1/basket   Update line quantities
//! DELETE /api/v1/basket   Remove lines
//! ```
//!
//! All four require a token. The remove body carries a comma-separated id
//! string; non-numeric entries are skipped, matching the documented wire
//! shape.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::basket::{parse_id_list, NewOrderLine, QuantityUpdate};
use crate::domain::ApiResult;

use super::auth::Authenticated;
use super::state::HttpState;

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct AddLinesRequest {
    /// Lines to insert, `{product_info, quantity}` each.
    #[serde(default)]
    pub items: Vec<NewOrderLine>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateLinesRequest {
    /// Updates to apply, `{id, quantity}` each.
    #[serde(default)]
    pub items: Vec<QuantityUpdate>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct RemoveLinesRequest {
    /// Comma-separated line ids, e.g. `"12,13,99"`.
    #[serde(default)]
    pub items: String,
}

/// Read the caller's basket.
#[utoipa::path(
    get,
    path = "/api/v1/basket",
    responses(
        (status = 200, description = "The basket, empty when none exists", body = crate::domain::basket::BasketView),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["basket"],
    operation_id = "readBasket"
)]
#[get("/basket")]
pub async fn read(state: web::Data<HttpState>, caller: Authenticated) -> ApiResult<HttpResponse> {
    let basket = state.baskets.basket(caller.user()).await?;
    Ok(HttpResponse::Ok().json(basket))
}

/// Add lines to the basket.
#[utoipa::path(
    post,
    path = "/api/v1/basket",
    request_body = AddLinesRequest,
    responses(
        (status = 200, description = "Counts of created and rejected lines"),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["basket"],
    operation_id = "addBasketLines"
)]
#[post("/basket")]
pub async fn add(
    state: web::Data<HttpState>,
    caller: Authenticated,
    body: web::Json<AddLinesRequest>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .baskets
        .add(caller.user(), body.into_inner().items)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": true,
        "created": outcome.created,
        "rejected": outcome.rejected,
    })))
}

/// Update line quantities in the basket.
#[utoipa::path(
    put,
    path = "/api/v1/basket",
    request_body = UpdateLinesRequest,
    responses(
        (status = 200, description = "Count of lines updated"),
        (status = 400, description = "Non-positive quantity in the batch", body = crate::domain::Error),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["basket"],
    operation_id = "updateBasketLines"
)]
#[put("/basket")]
pub async fn update(
    state: web::Data<HttpState>,
    caller: Authenticated,
    body: web::Json<UpdateLinesRequest>,
) -> ApiResult<HttpResponse> {
    let updated = state
        .baskets
        .update(caller.user(), &body.into_inner().items)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "status": true, "updated": updated })))
}

/// Remove lines from the basket.
#[utoipa::path(
    delete,
    path = "/api/v1/basket",
    request_body = RemoveLinesRequest,
    responses(
        (status = 200, description = "Count of lines removed"),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["basket"],
    operation_id = "removeBasketLines"
)]
#[delete("/basket")]
pub async fn remove(
    state: web::Data<HttpState>,
    caller: Authenticated,
    body: web::Json<RemoveLinesRequest>,
) -> ApiResult<HttpResponse> {
    let ids = parse_id_list(&body.items);
    let deleted = state.baskets.remove(caller.user(), &ids).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": true, "deleted": deleted })))
}
