//! Account lifecycle: registration, confirmation, login, profile upkeep.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::notification::Notification;
use crate::domain::ports::{
    AccessTokenRepository, ConfirmationTokenRepository, NotificationQueue, PasswordHasher,
    PasswordPolicy, UserRepository, UserRepositoryError,
};
use crate::domain::user::{AccessToken, Profile, ProfileUpdate, Registration, UserId};
use crate::domain::{ports::NewUser, ApiResult};

/// Orchestrates the account ports.
///
/// Notification dispatch is fire-and-forget: a queue failure is logged and
/// never surfaced to the caller.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    confirmations: Arc<dyn ConfirmationTokenRepository>,
    access_tokens: Arc<dyn AccessTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    policy: Arc<dyn PasswordPolicy>,
    queue: Arc<dyn NotificationQueue>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        confirmations: Arc<dyn ConfirmationTokenRepository>,
        access_tokens: Arc<dyn AccessTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        policy: Arc<dyn PasswordPolicy>,
        queue: Arc<dyn NotificationQueue>,
    ) -> Self {
        Self {
            users,
            confirmations,
            access_tokens,
            hasher,
            policy,
            queue,
        }
    }

    /// Register a new inactive account and enqueue a confirmation email.
    pub async fn register(&self, registration: Registration) -> ApiResult<()> {
        let violations = self.policy.validate(&registration.password);
        if !violations.is_empty() {
            return Err(Error::invalid_request("password does not satisfy the policy")
                .with_details(json!({ "password": violations })));
        }

        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(|err| Error::internal(err.to_string()))?;

        let email = registration.email.to_string();
        let user = NewUser {
            username: registration.username,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: email.clone(),
            password_hash,
            company: registration.company,
            position: registration.position,
            account_type: registration.account_type,
        };

        let user_id = match self.users.insert(user).await {
            Ok(id) => id,
            Err(UserRepositoryError::DuplicateEmail) => {
                return Err(Error::invalid_request("registration rejected")
                    .with_details(json!({ "email": ["user with this email already exists"] })));
            }
            Err(UserRepositoryError::DuplicateUsername) => {
                return Err(Error::invalid_request("registration rejected").with_details(
                    json!({ "username": ["user with this username already exists"] }),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        let token = self.confirmations.create(user_id).await?;
        self.dispatch(Notification::RegistrationConfirmation { email, token })
            .await;
        Ok(())
    }

    /// Consume a confirmation token and activate its account.
    pub async fn confirm(&self, email: &str, token: &str) -> ApiResult<()> {
        let token = Uuid::parse_str(token)
            .map_err(|_| Error::invalid_request("invalid token or email"))?;
        let user_id = self
            .confirmations
            .consume(email, token)
            .await?
            .ok_or_else(|| Error::invalid_request("invalid token or email"))?;
        self.users.activate(user_id).await?;
        Ok(())
    }

    /// Verify credentials and issue (or reuse) the account's access token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AccessToken> {
        let credentials = self
            .users
            .find_credentials_by_username(username)
            .await?
            .ok_or_else(|| Error::unauthorized("invalid username or password"))?;

        let matches = self
            .hasher
            .verify(password, &credentials.password_hash)
            .map_err(|err| Error::internal(err.to_string()))?;
        if !matches {
            return Err(Error::unauthorized("invalid username or password"));
        }
        if !credentials.is_active {
            return Err(Error::unauthorized("account is not confirmed"));
        }

        let token = self.access_tokens.issue(credentials.id).await?;
        Ok(AccessToken::from_uuid(token))
    }

    /// Enqueue a password-reset email for a known active address.
    ///
    /// Unknown addresses succeed silently so the endpoint cannot be used to
    /// probe for accounts.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        let Some(user_id) = self.users.find_active_by_email(email).await? else {
            return Ok(());
        };
        let token = self.confirmations.create(user_id).await?;
        self.dispatch(Notification::PasswordReset {
            email: email.to_owned(),
            token,
        })
        .await;
        Ok(())
    }

    /// Fetch the user's profile.
    pub async fn profile(&self, user: UserId) -> ApiResult<Profile> {
        self.users
            .find_by_id(user)
            .await?
            .ok_or_else(|| Error::not_found("account not found"))
    }

    /// Apply a partial profile update; a new password must pass the policy
    /// and is rehashed.
    pub async fn update_profile(&self, user: UserId, mut update: ProfileUpdate) -> ApiResult<()> {
        let new_hash = match update.password.take() {
            Some(password) => {
                let violations = self.policy.validate(&password);
                if !violations.is_empty() {
                    return Err(Error::invalid_request(
                        "password does not satisfy the policy",
                    )
                    .with_details(json!({ "password": violations })));
                }
                Some(
                    self.hasher
                        .hash(&password)
                        .map_err(|err| Error::internal(err.to_string()))?,
                )
            }
            None => None,
        };

        if update.is_empty() && new_hash.is_none() {
            return Ok(());
        }
        self.users.update_profile(user, update, new_hash).await?;
        Ok(())
    }

    async fn dispatch(&self, event: Notification) {
        let kind = event.kind();
        if let Err(err) = self.queue.enqueue(event).await {
            tracing::warn!(kind, error = %err, "notification was not enqueued");
        }
    }
}
