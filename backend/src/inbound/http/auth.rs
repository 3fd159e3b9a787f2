//! Token authentication for protected endpoints.
//!
//! Clients send `Authorization: Token <uuid>`. The extractor resolves the
//! token through the access-token port; a missing, malformed or unknown
//! token always collapses to the same `403 login required` failure so the
//! response does not reveal which part of the check failed.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::user::{AccessToken, AuthUser};
use crate::domain::Error;

use super::state::HttpState;

const TOKEN_SCHEME: &str = "Token ";

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthUser);

impl Authenticated {
    /// Access the resolved user.
    pub fn user(&self) -> &AuthUser {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<AccessToken> {
    let header = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    let raw = value.strip_prefix(TOKEN_SCHEME)?;
    AccessToken::parse(raw)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("http state missing"))?;
            let token = token.ok_or_else(|| {
                debug!("request carried no usable authorization header");
                Error::login_required()
            })?;
            let user = state
                .access_tokens
                .resolve(*token.as_uuid())
                .await?
                .ok_or_else(Error::login_required)?;
            Ok(Self(user))
        })
    }
}
