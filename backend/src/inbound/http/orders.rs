//! Order endpoints.
//!
//! ```text
//! GET  /api/v1/order   List placed orders, newest first
//! POST /api/v1/order   Place the basket with a delivery contact
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::contact::ContactDraft;
use crate::domain::{ApiResult, Error};

use super::auth::Authenticated;
use super::state::HttpState;

/// Order placement body: the basket order id plus the delivery contact.
///
/// `city`, `street`, `house` and `phone` are mandatory; the service reports
/// them through the "missing arguments" envelope so the error shape matches
/// the other endpoints.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct PlaceOrderRequest {
    pub id: Option<i64>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub phone: String,
}

/// List the caller's placed orders.
#[utoipa::path(
    get,
    path = "/api/v1/order",
    responses(
        (status = 200, description = "Placed orders, newest first", body = [crate::domain::basket::OrderView]),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/order")]
pub async fn list(state: web::Data<HttpState>, caller: Authenticated) -> ApiResult<HttpResponse> {
    let orders = state.baskets.orders(caller.user()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Place the caller's basket as a new order.
#[utoipa::path(
    post,
    path = "/api/v1/order",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed, notification queued"),
        (status = 400, description = "Missing arguments", body = crate::domain::Error),
        (status = 403, description = "Login required", body = crate::domain::Error),
        (status = 404, description = "No such basket order", body = crate::domain::Error)
    ),
    tags = ["orders"],
    operation_id = "placeOrder"
)]
#[post("/order")]
pub async fn place(
    state: web::Data<HttpState>,
    caller: Authenticated,
    body: web::Json<PlaceOrderRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let draft = ContactDraft {
        city: body.city,
        street: body.street,
        house: body.house,
        structure: body.structure,
        building: body.building,
        apartment: body.apartment,
        phone: body.phone,
    };
    // The id joins the contact fields in one missing-argument report.
    let Some(order_id) = body.id else {
        let mut missing = vec!["id"];
        missing.extend(draft.missing_fields());
        return Err(Error::invalid_request("missing arguments")
            .with_details(json!({ "missing": missing })));
    };
    state.baskets.place(caller.user(), order_id, &draft).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": true })))
}
