//! PostgreSQL-backed `UserRepository` via Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NewUser, StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::user::{AccountType, EmailAddress, Profile, ProfileUpdate, UserId};

use super::error_mapping::{is_unique_violation_on, map_diesel_error, map_pool_error};
use super::models::{CredentialsRow, NewUserRow, ProfileChanges, ProfileRow};
use super::pool::DbPool;
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_account_type(raw: &str, user_id: Uuid) -> AccountType {
    AccountType::parse(raw).unwrap_or_else(|| {
        tracing::warn!(value = raw, user_id = %user_id, "unrecognised account type, defaulting to buyer");
        AccountType::Buyer
    })
}

fn row_to_credentials(row: CredentialsRow) -> StoredCredentials {
    let account_type = parse_account_type(&row.account_type, row.id);
    StoredCredentials {
        id: UserId::from_uuid(row.id),
        email: row.email,
        password_hash: row.password_hash,
        account_type,
        is_active: row.is_active,
    }
}

fn row_to_profile(row: ProfileRow) -> Result<Profile, UserRepositoryError> {
    let account_type = parse_account_type(&row.account_type, row.id);
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserRepositoryError::query(format!("stored email is invalid: {err}")))?;
    Ok(Profile {
        id: UserId::from_uuid(row.id),
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        email,
        company: row.company,
        position: row.position,
        account_type,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: NewUser) -> Result<UserId, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = Uuid::new_v4();
        let row = NewUserRow {
            id,
            username: &user.username,
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            password_hash: &user.password_hash,
            company: &user.company,
            position: &user.position,
            account_type: user.account_type.as_str(),
            is_active: false,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation_on(&err, "users_email_key") {
                    UserRepositoryError::DuplicateEmail
                } else if is_unique_violation_on(&err, "users_username_key") {
                    UserRepositoryError::DuplicateUsername
                } else {
                    map_diesel_error(err)
                }
            })?;

        Ok(UserId::from_uuid(id))
    }

    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CredentialsRow> = users::table
            .filter(users::username.eq(username))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_credentials))
    }

    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserId>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: Option<Uuid> = users::table
            .filter(users::email.eq(email).and(users::is_active.eq(true)))
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(id.map(UserId::from_uuid))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Profile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProfileRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_profile).transpose()
    }

    async fn activate(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::is_active.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
        new_password_hash: Option<String>,
    ) -> Result<(), UserRepositoryError> {
        let changes = ProfileChanges {
            first_name: update.first_name,
            last_name: update.last_name,
            email: update.email.map(|e| e.to_string()),
            company: update.company,
            position: update.position,
            password_hash: new_password_hash,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation_on(&err, "users_email_key") {
                    UserRepositoryError::DuplicateEmail
                } else {
                    map_diesel_error(err)
                }
            })?;

        Ok(())
    }
}
