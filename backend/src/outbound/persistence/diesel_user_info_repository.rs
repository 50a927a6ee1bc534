//! PostgreSQL-backed `UserInfoRepository`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, UserInfoFilter, UserInfoRepository};
use crate::domain::{AppUserId, AuditStamp, UserInfo, UserInfoDraft, UserInfoId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserInfoRow, UserInfoRow, UserInfoUpdate};
use super::pool::DbPool;
use super::schema::user_infos;

/// Diesel implementation of profile storage.
#[derive(Clone)]
pub struct DieselUserInfoRepository {
    pool: DbPool,
}

impl DieselUserInfoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: UserInfoFilter) -> user_infos::BoxedQuery<'static, Pg> {
    let query = user_infos::table.into_boxed();
    match filter {
        UserInfoFilter::All => query,
        UserInfoFilter::Id(id) => query.filter(user_infos::id.eq(id.get())),
        UserInfoFilter::AppUser(app_user_id) => {
            query.filter(user_infos::app_user_id.eq(*app_user_id.as_uuid()))
        }
    }
}

#[async_trait]
impl UserInfoRepository for DieselUserInfoRepository {
    async fn get_by_id(&self, id: UserInfoId) -> Result<Option<UserInfo>, RepositoryError> {
        self.get_single_by_filter(UserInfoFilter::Id(id)).await
    }

    async fn get_all(&self, filter: UserInfoFilter) -> Result<Vec<UserInfo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserInfoRow> = filtered(filter)
            .order(user_infos::id.asc())
            .select(UserInfoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(UserInfo::from).collect())
    }

    async fn get_single_by_filter(
        &self,
        filter: UserInfoFilter,
    ) -> Result<Option<UserInfo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserInfoRow> = filtered(filter)
            .order(user_infos::id.asc())
            .select(UserInfoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(UserInfo::from))
    }

    async fn add(
        &self,
        details: UserInfoDraft,
        app_user_id: Option<AppUserId>,
        stamp: AuditStamp,
    ) -> Result<UserInfo, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: UserInfoRow = diesel::insert_into(user_infos::table)
            .values(&NewUserInfoRow::new(&details, app_user_id, &stamp))
            .returning(UserInfoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update(&self, user_info: &UserInfo) -> Result<Option<UserInfo>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<UserInfoRow> =
            diesel::update(user_infos::table.find(user_info.id.get()))
                .set(UserInfoUpdate::from(user_info))
                .returning(UserInfoRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        Ok(stored.map(UserInfo::from))
    }

    async fn delete(&self, id: UserInfoId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(user_infos::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
