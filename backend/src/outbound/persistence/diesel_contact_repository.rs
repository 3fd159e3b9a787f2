//! PostgreSQL-backed `ContactRepository` via Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::contact::ContactDraft;
use crate::domain::ports::{ContactRepository, ContactRepositoryError};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewContactRow;
use super::pool::DbPool;
use super::schema::contacts;

#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn find_matching(
    conn: &mut AsyncPgConnection,
    user: Uuid,
    draft: &ContactDraft,
) -> Result<Option<i64>, diesel::result::Error> {
    contacts::table
        .filter(contacts::user_id.eq(user))
        .filter(contacts::city.eq(&draft.city))
        .filter(contacts::street.eq(&draft.street))
        .filter(contacts::house.eq(&draft.house))
        .filter(contacts::structure.eq(&draft.structure))
        .filter(contacts::building.eq(&draft.building))
        .filter(contacts::apartment.eq(&draft.apartment))
        .filter(contacts::phone.eq(&draft.phone))
        .select(contacts::id)
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn get_or_create(
        &self,
        user: UserId,
        draft: &ContactDraft,
    ) -> Result<i64, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = *user.as_uuid();

        if let Some(id) = find_matching(&mut conn, user, draft)
            .await
            .map_err(map_diesel_error)?
        {
            return Ok(id);
        }

        let inserted: Option<i64> = diesel::insert_into(contacts::table)
            .values(&NewContactRow {
                user_id: user,
                city: &draft.city,
                street: &draft.street,
                house: &draft.house,
                structure: &draft.structure,
                building: &draft.building,
                apartment: &draft.apartment,
                phone: &draft.phone,
            })
            .on_conflict_do_nothing()
            .returning(contacts::id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(id) = inserted {
            return Ok(id);
        }

        // Lost the insert race against an identical draft.
        find_matching(&mut conn, user, draft)
            .await
            .map_err(map_diesel_error)?
            .ok_or_else(|| ContactRepositoryError::query("contact vanished between upserts"))
    }
}
