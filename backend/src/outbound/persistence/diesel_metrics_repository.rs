//! PostgreSQL-backed `MetricsRepository`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    Includes, MetricsFilter, MetricsRelation, MetricsRepository, RepositoryError,
};
use crate::domain::{AuditStamp, Metrics, MetricsDetails, MetricsId, NewMetrics};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MetricsRow, MetricsUpdate, NewMetricsRow};
use super::pool::DbPool;
use super::relation_loaders;
use super::schema::metrics;

/// Diesel implementation of metric reading storage.
#[derive(Clone)]
pub struct DieselMetricsRepository {
    pool: DbPool,
}

impl DieselMetricsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: MetricsFilter) -> metrics::BoxedQuery<'static, Pg> {
    let query = metrics::table.into_boxed();
    match filter {
        MetricsFilter::All => query,
        MetricsFilter::Id(id) => query.filter(metrics::id.eq(id.get())),
        MetricsFilter::DiseaseHistory(history) => {
            query.filter(metrics::disease_history_id.eq(history.get()))
        }
    }
}

async fn with_relations(
    conn: &mut AsyncPgConnection,
    readings: Vec<Metrics>,
    includes: &Includes<MetricsRelation>,
) -> QueryResult<Vec<MetricsDetails>> {
    if readings.is_empty() || !includes.contains(MetricsRelation::DiseaseHistory) {
        return Ok(readings.into_iter().map(MetricsDetails::bare).collect());
    }

    let ids = readings.iter().map(|reading| reading.disease_history_id.get());
    let histories = relation_loaders::histories_by_id(conn, ids).await?;
    Ok(readings
        .into_iter()
        .map(|reading| MetricsDetails {
            disease_history: histories.get(&reading.disease_history_id.get()).cloned(),
            metrics: reading,
        })
        .collect())
}

#[async_trait]
impl MetricsRepository for DieselMetricsRepository {
    async fn get_by_id(&self, id: MetricsId) -> Result<Option<Metrics>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MetricsRow> = metrics::table
            .find(id.get())
            .select(MetricsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Metrics::from))
    }

    async fn get_all(
        &self,
        filter: MetricsFilter,
        includes: Includes<MetricsRelation>,
    ) -> Result<Vec<MetricsDetails>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MetricsRow> = filtered(filter)
            .order(metrics::id.asc())
            .select(MetricsRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let readings = rows.into_iter().map(Metrics::from).collect();
        with_relations(&mut conn, readings, &includes)
            .await
            .map_err(map_diesel_error)
    }

    async fn get_single_by_filter(
        &self,
        filter: MetricsFilter,
        includes: Includes<MetricsRelation>,
    ) -> Result<Option<MetricsDetails>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MetricsRow> = filtered(filter)
            .order(metrics::id.asc())
            .select(MetricsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let readings = row.into_iter().map(Metrics::from).collect();
        let details = with_relations(&mut conn, readings, &includes)
            .await
            .map_err(map_diesel_error)?;
        Ok(details.into_iter().next())
    }

    async fn add(&self, reading: NewMetrics, stamp: AuditStamp) -> Result<Metrics, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMetricsRow {
            name: reading.name(),
            value: reading.value(),
            disease_history_id: reading.disease_history_id().get(),
            created_by: &stamp.created_by,
            created: stamp.created,
        };
        let stored: MetricsRow = diesel::insert_into(metrics::table)
            .values(&row)
            .returning(MetricsRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update(&self, reading: &Metrics) -> Result<Option<Metrics>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<MetricsRow> = diesel::update(metrics::table.find(reading.id.get()))
            .set(MetricsUpdate::from(reading))
            .returning(MetricsRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(stored.map(Metrics::from))
    }

    async fn delete(&self, id: MetricsId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(metrics::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
