//! Port for delivery contact persistence.

use async_trait::async_trait;

use crate::domain::contact::ContactDraft;
use crate::domain::error::Error;
use crate::domain::user::UserId;

/// Errors raised by contact repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactRepositoryError {
    /// Repository connection could not be established.
    #[error("contact repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("contact repository query failed: {message}")]
    Query { message: String },
}

impl ContactRepositoryError {
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

impl From<ContactRepositoryError> for Error {
    fn from(err: ContactRepositoryError) -> Self {
        match err {
            ContactRepositoryError::Connection { .. } => {
                Error::service_unavailable("storage is unavailable")
            }
            ContactRepositoryError::Query { .. } => Error::internal("storage query failed"),
        }
    }
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Return the id of the user's contact matching the draft exactly,
    /// inserting it when absent.
    async fn get_or_create(
        &self,
        user: UserId,
        draft: &ContactDraft,
    ) -> Result<i64, ContactRepositoryError>;
}

/// Fixture repository that always answers with contact id 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn get_or_create(
        &self,
        _user: UserId,
        _draft: &ContactDraft,
    ) -> Result<i64, ContactRepositoryError> {
        Ok(1)
    }
}
