//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST endpoint and the schemas their bodies
//! reference. The token security scheme mirrors the `Authorization:
//! Token <uuid>` header resolved by the auth extractor.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AccessToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <uuid>` issued by POST /api/v1/user/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        description = "Retail backend: catalog browsing, supplier imports, baskets and orders."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AccessToken" = [])),
    paths(
        crate::inbound::http::catalog::categories,
        crate::inbound::http::catalog::shops,
        crate::inbound::http::catalog::search_offers,
        crate::inbound::http::catalog::product_offers,
        crate::inbound::http::partner::update,
        crate::inbound::http::users::register,
        crate::inbound::http::users::confirm,
        crate::inbound::http::users::login,
        crate::inbound::http::users::password_reset,
        crate::inbound::http::users::details,
        crate::inbound::http::users::update_details,
        crate::inbound::http::basket::read,
        crate::inbound::http::basket::add,
        crate::inbound::http::basket::update,
        crate::inbound::http::basket::remove,
        crate::inbound::http::orders::list,
        crate::inbound::http::orders::place,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::catalog::CategorySummary,
        crate::domain::catalog::ShopSummary,
        crate::domain::catalog::OfferView,
        crate::domain::basket::BasketView,
        crate::domain::basket::OrderView,
        crate::domain::user::Profile,
    )),
    tags(
        (name = "catalog", description = "Public read access to the catalog"),
        (name = "partner", description = "Supplier price-list imports"),
        (name = "users", description = "Registration, login and profiles"),
        (name = "basket", description = "Shopping basket operations"),
        (name = "orders", description = "Order placement and history"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
