//! Shared offer-view assembly for the catalog and order adapters.
//!
//! Both read paths render offers the same way: one join row per offer plus a
//! follow-up query attaching the parameter map.

use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::catalog::{CategorySummary, OfferView, ProductRef, ShopSummary};

use super::schema::{parameters, product_parameters};

pub(super) type OfferJoinRow = (
    i64,    // offer id
    i64,    // external id
    String, // model
    i64,    // price
    i64,    // price_rrc
    i32,    // quantity
    i64,    // product id
    String, // product name
    i32,    // category id
    String, // category name
    i32,    // shop id
    String, // shop name
    bool,   // shop active
);

pub(super) fn join_row_to_view(row: OfferJoinRow) -> OfferView {
    let (
        id,
        external_id,
        model,
        price,
        price_rrc,
        quantity,
        product_id,
        product_name,
        category_id,
        category_name,
        shop_id,
        shop_name,
        shop_active,
    ) = row;
    OfferView {
        id,
        external_id,
        model,
        product: ProductRef {
            id: product_id,
            name: product_name,
            category: CategorySummary {
                id: category_id,
                name: category_name,
            },
        },
        shop: ShopSummary {
            id: shop_id,
            name: shop_name,
            active: shop_active,
        },
        price,
        price_rrc,
        quantity,
        parameters: BTreeMap::new(),
    }
}

/// Fill the parameter maps of the given views in one query.
pub(super) async fn attach_parameters(
    conn: &mut AsyncPgConnection,
    views: &mut [OfferView],
) -> Result<(), diesel::result::Error> {
    if views.is_empty() {
        return Ok(());
    }

    let offer_ids: Vec<i64> = views.iter().map(|view| view.id).collect();
    let rows: Vec<(i64, String, String)> = product_parameters::table
        .inner_join(parameters::table)
        .filter(product_parameters::offer_id.eq_any(&offer_ids))
        .select((
            product_parameters::offer_id,
            parameters::name,
            product_parameters::value,
        ))
        .load(conn)
        .await?;

    let mut by_offer: BTreeMap<i64, BTreeMap<String, String>> = BTreeMap::new();
    for (offer_id, name, value) in rows {
        by_offer.entry(offer_id).or_default().insert(name, value);
    }
    for view in views.iter_mut() {
        if let Some(params) = by_offer.remove(&view.id) {
            view.parameters = params;
        }
    }
    Ok(())
}
