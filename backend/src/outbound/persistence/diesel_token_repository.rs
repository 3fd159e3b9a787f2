//! PostgreSQL-backed token repositories via Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    AccessTokenRepository, ConfirmationTokenRepository, TokenRepositoryError,
};
use crate::domain::user::{AccountType, AuthUser, EmailAddress, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewAccessTokenRow, NewConfirmEmailTokenRow};
use super::pool::DbPool;
use super::schema::{access_tokens, confirm_email_tokens, users};

#[derive(Clone)]
pub struct DieselConfirmationTokenRepository {
    pool: DbPool,
}

impl DieselConfirmationTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfirmationTokenRepository for DieselConfirmationTokenRepository {
    async fn create(&self, user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let token = Uuid::new_v4();
        diesel::insert_into(confirm_email_tokens::table)
            .values(&NewConfirmEmailTokenRow {
                user_id: *user_id.as_uuid(),
                token,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(token)
    }

    async fn consume(
        &self,
        email: &str,
        token: Uuid,
    ) -> Result<Option<UserId>, TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let owner: Option<Uuid> = confirm_email_tokens::table
            .inner_join(users::table)
            .filter(users::email.eq(email))
            .filter(confirm_email_tokens::token.eq(token))
            .select(confirm_email_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(owner) = owner else {
            return Ok(None);
        };

        // The delete re-checks the pair, so a concurrent consume of the
        // same token wins at most once.
        let deleted = diesel::delete(
            confirm_email_tokens::table
                .filter(confirm_email_tokens::user_id.eq(owner))
                .filter(confirm_email_tokens::token.eq(token)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok((deleted > 0).then(|| UserId::from_uuid(owner)))
    }
}

#[derive(Clone)]
pub struct DieselAccessTokenRepository {
    pool: DbPool,
}

impl DieselAccessTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenRepository for DieselAccessTokenRepository {
    async fn issue(&self, user_id: UserId) -> Result<Uuid, TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let existing: Option<Uuid> = access_tokens::table
            .filter(access_tokens::user_id.eq(user_id.as_uuid()))
            .select(access_tokens::token)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(token) = existing {
            return Ok(token);
        }

        let inserted: Option<Uuid> = diesel::insert_into(access_tokens::table)
            .values(&NewAccessTokenRow {
                user_id: *user_id.as_uuid(),
                token: Uuid::new_v4(),
            })
            .on_conflict(access_tokens::user_id)
            .do_nothing()
            .returning(access_tokens::token)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(token) = inserted {
            return Ok(token);
        }

        // Lost the insert race; the winner's token is the account's token.
        access_tokens::table
            .filter(access_tokens::user_id.eq(user_id.as_uuid()))
            .select(access_tokens::token)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn resolve(&self, token: Uuid) -> Result<Option<AuthUser>, TokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(Uuid, String, String)> = access_tokens::table
            .inner_join(users::table)
            .filter(access_tokens::token.eq(token))
            .filter(users::is_active.eq(true))
            .select((users::id, users::email, users::account_type))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some((id, email, account_type)) = row else {
            return Ok(None);
        };
        let email = EmailAddress::new(email).map_err(|err| {
            TokenRepositoryError::query(format!("stored email is invalid: {err}"))
        })?;
        let account_type = AccountType::parse(&account_type).unwrap_or(AccountType::Buyer);

        Ok(Some(AuthUser {
            id: UserId::from_uuid(id),
            email,
            account_type,
        }))
    }
}
