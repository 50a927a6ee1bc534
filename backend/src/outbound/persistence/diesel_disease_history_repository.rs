//! PostgreSQL-backed `DiseaseHistoryRepository`.
//!
//! Relations are filled with batched follow-up queries from
//! [`super::relation_loaders`] rather than joins, so a history with many
//! treatments does not multiply its metric rows.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    DiseaseHistoryFilter, DiseaseHistoryRelation, DiseaseHistoryRepository, Includes,
    RepositoryError,
};
use crate::domain::{
    AuditStamp, DiseaseHistory, DiseaseHistoryDetails, DiseaseHistoryId, NewDiseaseHistory,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DiseaseHistoryRow, DiseaseHistoryUpdate, NewDiseaseHistoryRow};
use super::pool::DbPool;
use super::relation_loaders;
use super::schema::{app_users, disease_histories, user_infos};

/// Diesel implementation of disease history storage.
#[derive(Clone)]
pub struct DieselDiseaseHistoryRepository {
    pool: DbPool,
}

impl DieselDiseaseHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: DiseaseHistoryFilter) -> disease_histories::BoxedQuery<'static, Pg> {
    let query = disease_histories::table.into_boxed();
    match filter {
        DiseaseHistoryFilter::All => query,
        DiseaseHistoryFilter::Id(id) => query.filter(disease_histories::id.eq(id.get())),
        DiseaseHistoryFilter::Patient(patient) => {
            query.filter(disease_histories::patient_info_id.eq(patient.get()))
        }
        DiseaseHistoryFilter::PatientUserName(user_name) => {
            let principals = app_users::table
                .filter(app_users::user_name.eq(user_name.as_str().to_owned()))
                .select(app_users::id.nullable());
            let profiles = user_infos::table
                .filter(user_infos::app_user_id.eq_any(principals))
                .select(user_infos::id);
            query.filter(disease_histories::patient_info_id.eq_any(profiles))
        }
    }
}

async fn with_relations(
    conn: &mut AsyncPgConnection,
    histories: Vec<DiseaseHistory>,
    includes: &Includes<DiseaseHistoryRelation>,
) -> QueryResult<Vec<DiseaseHistoryDetails>> {
    if histories.is_empty() || includes.is_empty() {
        return Ok(histories.into_iter().map(DiseaseHistoryDetails::bare).collect());
    }

    let history_ids: Vec<i32> = histories.iter().map(|history| history.id.get()).collect();

    let patients = if includes.contains(DiseaseHistoryRelation::Patient) {
        let ids = histories.iter().map(|history| history.patient_info_id.get());
        Some(relation_loaders::profiles_by_id(conn, ids).await?)
    } else {
        None
    };
    let mut treatments = if includes.contains(DiseaseHistoryRelation::Treatments) {
        Some(relation_loaders::treatments_by_history(conn, history_ids.iter().copied()).await?)
    } else {
        None
    };
    let mut metrics = if includes.contains(DiseaseHistoryRelation::Metrics) {
        Some(relation_loaders::metrics_by_history(conn, history_ids.iter().copied()).await?)
    } else {
        None
    };

    Ok(histories
        .into_iter()
        .map(|history| {
            let id = history.id.get();
            let patient_id = history.patient_info_id.get();
            DiseaseHistoryDetails {
                patient: patients
                    .as_ref()
                    .and_then(|loaded| loaded.get(&patient_id).cloned()),
                treatments: treatments
                    .as_mut()
                    .map(|loaded| loaded.remove(&id).unwrap_or_default()),
                metrics: metrics
                    .as_mut()
                    .map(|loaded| loaded.remove(&id).unwrap_or_default()),
                disease_history: history,
            }
        })
        .collect())
}

#[async_trait]
impl DiseaseHistoryRepository for DieselDiseaseHistoryRepository {
    async fn get_by_id(
        &self,
        id: DiseaseHistoryId,
    ) -> Result<Option<DiseaseHistory>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DiseaseHistoryRow> = disease_histories::table
            .find(id.get())
            .select(DiseaseHistoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(DiseaseHistory::from))
    }

    async fn get_all(
        &self,
        filter: DiseaseHistoryFilter,
        includes: Includes<DiseaseHistoryRelation>,
    ) -> Result<Vec<DiseaseHistoryDetails>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DiseaseHistoryRow> = filtered(filter)
            .order(disease_histories::id.asc())
            .select(DiseaseHistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let histories = rows.into_iter().map(DiseaseHistory::from).collect();
        with_relations(&mut conn, histories, &includes)
            .await
            .map_err(map_diesel_error)
    }

    async fn get_single_by_filter(
        &self,
        filter: DiseaseHistoryFilter,
        includes: Includes<DiseaseHistoryRelation>,
    ) -> Result<Option<DiseaseHistoryDetails>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DiseaseHistoryRow> = filtered(filter)
            .order(disease_histories::id.asc())
            .select(DiseaseHistoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let histories = row.into_iter().map(DiseaseHistory::from).collect();
        let details = with_relations(&mut conn, histories, &includes)
            .await
            .map_err(map_diesel_error)?;
        Ok(details.into_iter().next())
    }

    async fn add(
        &self,
        history: NewDiseaseHistory,
        stamp: AuditStamp,
    ) -> Result<DiseaseHistory, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDiseaseHistoryRow {
            patient_info_id: history.patient_info_id().get(),
            title: history.title(),
            notes: history.notes(),
            created_by: &stamp.created_by,
            created: stamp.created,
        };
        let stored: DiseaseHistoryRow = diesel::insert_into(disease_histories::table)
            .values(&row)
            .returning(DiseaseHistoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update(
        &self,
        history: &DiseaseHistory,
    ) -> Result<Option<DiseaseHistory>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<DiseaseHistoryRow> =
            diesel::update(disease_histories::table.find(history.id.get()))
                .set(DiseaseHistoryUpdate::from(history))
                .returning(DiseaseHistoryRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        Ok(stored.map(DiseaseHistory::from))
    }

    async fn delete(&self, id: DiseaseHistoryId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(disease_histories::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
