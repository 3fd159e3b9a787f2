//! Route table for the REST API.

use actix_web::web;

use super::{basket, catalog, orders, partner, users};

/// Mount every `/api/v1` endpoint on the given config.
///
/// Health probes live at the root and are mounted by the server builder,
/// not here, so probe traffic stays outside the API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(catalog::categories)
            .service(catalog::shops)
            .service(catalog::search_offers)
            .service(catalog::product_offers)
            .service(partner::update)
            .service(users::register)
            .service(users::confirm)
            .service(users::login)
            .service(users::password_reset)
            .service(users::details)
            .service(users::update_details)
            .service(basket::read)
            .service(basket::add)
            .service(basket::update)
            .service(basket::remove)
            .service(orders::list)
            .service(orders::place),
    );
}
