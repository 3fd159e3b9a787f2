//! Ports for email-confirmation tokens and opaque access tokens.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::user::{AuthUser, UserId};

/// Errors raised by token repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenRepositoryError {
    /// Repository connection could not be established.
    #[error("token repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("token repository query failed: {message}")]
    Query { message: String },
}

impl TokenRepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<TokenRepositoryError> for Error {
    fn from(err: TokenRepositoryError) -> Self {
        match err {
            TokenRepositoryError::Connection { .. } => {
                Error::service_unavailable("storage is unavailable")
            }
            TokenRepositoryError::Query { .. } => Error::internal("storage query failed"),
        }
    }
}

/// One-shot tokens proving control of a registered email address.
#[async_trait]
pub trait ConfirmationTokenRepository: Send + Sync {
    /// Create a fresh confirmation token for a user.
    async fn create(&self, user_id: UserId) -> Result<Uuid, TokenRepositoryError>;

    /// Delete the token matching `(email, token)` and return its owner.
    ///
    /// Returns `None` when no such token exists; a consumed token cannot be
    /// consumed again.
    async fn consume(
        &self,
        email: &str,
        token: Uuid,
    ) -> Result<Option<UserId>, TokenRepositoryError>;
}

/// Long-lived opaque tokens presented in the `Authorization` header.
#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Return the user's access token, creating one on first login.
    async fn issue(&self, user_id: UserId) -> Result<Uuid, TokenRepositoryError>;

    /// Resolve a presented token to its active owner.
    async fn resolve(&self, token: Uuid) -> Result<Option<AuthUser>, TokenRepositoryError>;
}

/// Fixture confirmation tokens: creation yields the nil token, consumption
/// never matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConfirmationTokenRepository;

#[async_trait]
impl ConfirmationTokenRepository for FixtureConfirmationTokenRepository {
    async fn create(&self, _user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        Ok(Uuid::nil())
    }

    async fn consume(
        &self,
        _email: &str,
        _token: Uuid,
    ) -> Result<Option<UserId>, TokenRepositoryError> {
        Ok(None)
    }
}

/// Fixture access tokens: every resolution fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccessTokenRepository;

#[async_trait]
impl AccessTokenRepository for FixtureAccessTokenRepository {
    async fn issue(&self, _user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        Ok(Uuid::nil())
    }

    async fn resolve(&self, _token: Uuid) -> Result<Option<AuthUser>, TokenRepositoryError> {
        Ok(None)
    }
}
