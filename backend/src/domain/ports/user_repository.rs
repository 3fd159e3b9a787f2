//! Port for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::user::{AccountType, Profile, ProfileUpdate, UserId};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// Another account already uses this email address.
    #[error("email address is already registered")]
    DuplicateEmail,
    /// Another account already uses this username.
    #[error("username is already taken")]
    DuplicateUsername,
}

impl UserRepositoryError {
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

impl From<UserRepositoryError> for Error {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::Connection { .. } => {
                Error::service_unavailable("storage is unavailable")
            }
            UserRepositoryError::DuplicateEmail | UserRepositoryError::DuplicateUsername => {
                Error::conflict(err.to_string())
            }
            UserRepositoryError::Query { .. } => Error::internal("storage query failed"),
        }
    }
}

/// A fully-specified new account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub company: String,
    pub position: String,
    pub account_type: AccountType,
}

/// Credentials row used by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
    pub is_active: bool,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new inactive account; duplicate email or username is a
    /// dedicated error so the service can report it per field.
    async fn insert(&self, user: NewUser) -> Result<UserId, UserRepositoryError>;

    /// Fetch the credentials row for a username, if the account exists.
    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Fetch the id of an active account by email, if one exists.
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserId>, UserRepositoryError>;

    /// Fetch a profile by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, UserRepositoryError>;

    /// Mark an account active. Returns whether a row was updated.
    async fn activate(&self, id: UserId) -> Result<bool, UserRepositoryError>;

    /// Apply a partial profile update, optionally replacing the stored
    /// password hash.
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
        new_password_hash: Option<String>,
    ) -> Result<(), UserRepositoryError>;
}

/// Fixture repository for tests that do not exercise accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _user: NewUser) -> Result<UserId, UserRepositoryError> {
        Ok(UserId::from_uuid(Uuid::nil()))
    }

    async fn find_credentials_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_active_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<UserId>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<Profile>, UserRepositoryError> {
        Ok(None)
    }

    async fn activate(&self, _id: UserId) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn update_profile(
        &self,
        _id: UserId,
        _update: ProfileUpdate,
        _new_password_hash: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}
