//! PostgreSQL-backed `TreatmentRepository`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    Includes, RepositoryError, TreatmentFilter, TreatmentRelation, TreatmentRepository,
};
use crate::domain::{AuditStamp, NewTreatment, Treatment, TreatmentDetails, TreatmentId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTreatmentRow, TreatmentRow, TreatmentUpdate};
use super::pool::DbPool;
use super::relation_loaders;
use super::schema::treatments;

/// Diesel implementation of treatment storage.
#[derive(Clone)]
pub struct DieselTreatmentRepository {
    pool: DbPool,
}

impl DieselTreatmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: TreatmentFilter) -> treatments::BoxedQuery<'static, Pg> {
    let query = treatments::table.into_boxed();
    match filter {
        TreatmentFilter::All => query,
        TreatmentFilter::Id(id) => query.filter(treatments::id.eq(id.get())),
        TreatmentFilter::DiseaseHistory(history) => {
            query.filter(treatments::disease_history_id.eq(history.get()))
        }
        TreatmentFilter::Medicine(medicine) => {
            query.filter(treatments::medicine_id.eq(medicine.get()))
        }
    }
}

async fn with_relations(
    conn: &mut AsyncPgConnection,
    rows: Vec<Treatment>,
    includes: &Includes<TreatmentRelation>,
) -> QueryResult<Vec<TreatmentDetails>> {
    if rows.is_empty() || includes.is_empty() {
        return Ok(rows.into_iter().map(TreatmentDetails::bare).collect());
    }

    let medicines = if includes.contains(TreatmentRelation::Medicine) {
        let ids = rows.iter().map(|treatment| treatment.medicine_id.get());
        Some(relation_loaders::medicines_by_id(conn, ids).await?)
    } else {
        None
    };

    // The patient hangs off the history, so either include needs histories.
    let wants_history = includes.contains(TreatmentRelation::DiseaseHistory);
    let wants_patient = includes.contains(TreatmentRelation::Patient);
    let histories = if wants_history || wants_patient {
        let ids = rows.iter().map(|treatment| treatment.disease_history_id.get());
        relation_loaders::histories_by_id(conn, ids).await?
    } else {
        Default::default()
    };
    let patients = if wants_patient {
        let ids = histories.values().map(|history| history.patient_info_id.get());
        Some(relation_loaders::profiles_by_id(conn, ids).await?)
    } else {
        None
    };

    Ok(rows
        .into_iter()
        .map(|treatment| {
            let history = histories.get(&treatment.disease_history_id.get());
            TreatmentDetails {
                medicine: medicines
                    .as_ref()
                    .and_then(|loaded| loaded.get(&treatment.medicine_id.get()).cloned()),
                patient: patients.as_ref().and_then(|loaded| {
                    history.and_then(|history| loaded.get(&history.patient_info_id.get()).cloned())
                }),
                disease_history: history.filter(|_| wants_history).cloned(),
                treatment,
            }
        })
        .collect())
}

#[async_trait]
impl TreatmentRepository for DieselTreatmentRepository {
    async fn get_by_id(&self, id: TreatmentId) -> Result<Option<Treatment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TreatmentRow> = treatments::table
            .find(id.get())
            .select(TreatmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Treatment::from))
    }

    async fn get_all(
        &self,
        filter: TreatmentFilter,
        includes: Includes<TreatmentRelation>,
    ) -> Result<Vec<TreatmentDetails>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TreatmentRow> = filtered(filter)
            .order(treatments::id.asc())
            .select(TreatmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let treatments = rows.into_iter().map(Treatment::from).collect();
        with_relations(&mut conn, treatments, &includes)
            .await
            .map_err(map_diesel_error)
    }

    async fn get_single_by_filter(
        &self,
        filter: TreatmentFilter,
        includes: Includes<TreatmentRelation>,
    ) -> Result<Option<TreatmentDetails>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TreatmentRow> = filtered(filter)
            .order(treatments::id.asc())
            .select(TreatmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let treatments = row.into_iter().map(Treatment::from).collect();
        let details = with_relations(&mut conn, treatments, &includes)
            .await
            .map_err(map_diesel_error)?;
        Ok(details.into_iter().next())
    }

    async fn add(
        &self,
        treatment: NewTreatment,
        stamp: AuditStamp,
    ) -> Result<Treatment, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let dosing = treatment.dosing();
        let row = NewTreatmentRow {
            medicine_id: treatment.medicine_id().get(),
            disease_history_id: treatment.disease_history_id().get(),
            diagnosis: treatment.diagnosis(),
            medicine_weight: dosing.medicine_weight(),
            solution_volume: dosing.solution_volume(),
            dosage: dosing.dosage(),
            is_completed: false,
            created_by: &stamp.created_by,
            created: stamp.created,
        };
        let stored: TreatmentRow = diesel::insert_into(treatments::table)
            .values(&row)
            .returning(TreatmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update(&self, treatment: &Treatment) -> Result<Option<Treatment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<TreatmentRow> =
            diesel::update(treatments::table.find(treatment.id.get()))
                .set(TreatmentUpdate::from(treatment))
                .returning(TreatmentRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        Ok(stored.map(Treatment::from))
    }

    async fn delete(&self, id: TreatmentId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(treatments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
