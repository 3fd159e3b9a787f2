//! Account endpoints.
//!
//! ```text
//! POST /api/v1/user/register          Create an inactive account
//! POST /api/v1/user/register/confirm  Activate via emailed token
//! POST /api/v1/user/login             Exchange credentials for a token
//! POST /api/v1/user/password_reset    Request a reset email
//! GET  /api/v1/user/details           Read own profile
//! POST /api/v1/user/details           Partially update own profile
//! ```
//!
//! Bodies with mandatory fields are deserialised with every field optional
//! so a single "missing arguments" failure can name all absent fields.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::domain::user::{AccountType, EmailAddress, ProfileUpdate, Registration};
use crate::domain::{ApiResult, Error};

use super::auth::Authenticated;
use super::state::HttpState;
use super::validation::RequiredFields;

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    /// Account kind: `shop` or `buyer`.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct ConfirmRequest {
    pub email: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct DetailsUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub password: Option<String>,
}

fn ok_status() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": true }))
}

fn parse_email(raw: String) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| {
        Error::invalid_request("registration rejected")
            .with_details(json!({ "email": [err.to_string()] }))
    })
}

fn parse_account_type(raw: &str) -> Result<AccountType, Error> {
    AccountType::parse(raw).ok_or_else(|| {
        Error::invalid_request("registration rejected")
            .with_details(json!({ "type": ["must be either 'shop' or 'buyer'"] }))
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, confirmation email queued"),
        (status = 400, description = "Missing arguments or field violations", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/user/register")]
pub async fn register(
    state: web::Data<HttpState>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let mut required = RequiredFields::new();
    let username = required.take("username", body.username);
    let first_name = required.take("first_name", body.first_name);
    let last_name = required.take("last_name", body.last_name);
    let email = required.take("email", body.email);
    let password = required.take("password", body.password);
    let company = required.take("company", body.company);
    let position = required.take("position", body.position);
    let account_type = required.take("type", body.account_type);
    required.check()?;

    // All Some after the check; the or_default arms are unreachable.
    let registration = Registration {
        username: username.unwrap_or_default(),
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email: parse_email(email.unwrap_or_default())?,
        password: password.unwrap_or_default(),
        company: company.unwrap_or_default(),
        position: position.unwrap_or_default(),
        account_type: parse_account_type(&account_type.unwrap_or_default())?,
    };
    state.accounts.register(registration).await?;
    Ok(ok_status())
}

/// Confirm a registration with the emailed token.
#[utoipa::path(
    post,
    path = "/api/v1/user/register/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Account activated"),
        (status = 400, description = "Missing arguments or bad token", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "confirmRegistration"
)]
#[post("/user/register/confirm")]
pub async fn confirm(
    state: web::Data<HttpState>,
    body: web::Json<ConfirmRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let mut required = RequiredFields::new();
    let email = required.take("email", body.email);
    let token = required.take("token", body.token);
    required.check()?;

    state
        .accounts
        .confirm(&email.unwrap_or_default(), &token.unwrap_or_default())
        .await?;
    Ok(ok_status())
}

/// Exchange credentials for an access token.
#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 400, description = "Missing arguments", body = crate::domain::Error),
        (status = 401, description = "Bad credentials or unconfirmed account", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/user/login")]
pub async fn login(
    state: web::Data<HttpState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let mut required = RequiredFields::new();
    let username = required.take("username", body.username);
    let password = required.take("password", body.password);
    required.check()?;

    let token = state
        .accounts
        .login(&username.unwrap_or_default(), &password.unwrap_or_default())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "status": true, "token": token })))
}

/// Request a password reset email.
///
/// Always succeeds so the endpoint cannot be used to probe which addresses
/// hold accounts.
#[utoipa::path(
    post,
    path = "/api/v1/user/password_reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset email queued if the account exists"),
        (status = 400, description = "Missing arguments", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "requestPasswordReset"
)]
#[post("/user/password_reset")]
pub async fn password_reset(
    state: web::Data<HttpState>,
    body: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let mut required = RequiredFields::new();
    let email = required.take("email", body.email);
    required.check()?;

    state
        .accounts
        .request_password_reset(&email.unwrap_or_default())
        .await?;
    Ok(ok_status())
}

/// Read the caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/user/details",
    responses(
        (status = 200, description = "The caller's profile", body = crate::domain::user::Profile),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "userDetails"
)]
#[get("/user/details")]
pub async fn details(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let profile = state.accounts.profile(caller.user().id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Partially update the caller's profile.
#[utoipa::path(
    post,
    path = "/api/v1/user/details",
    request_body = DetailsUpdateRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Field violations", body = crate::domain::Error),
        (status = 403, description = "Login required", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "updateUserDetails"
)]
#[post("/user/details")]
pub async fn update_details(
    state: web::Data<HttpState>,
    caller: Authenticated,
    body: web::Json<DetailsUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let email = body.email.map(parse_email).transpose()?;
    let update = ProfileUpdate {
        first_name: body.first_name,
        last_name: body.last_name,
        email,
        company: body.company,
        position: body.position,
        password: body.password,
    };
    state.accounts.update_profile(caller.user().id, update).await?;
    Ok(ok_status())
}
