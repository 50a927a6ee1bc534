//! PostgreSQL-backed `MedicineRepository`.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MedicineFilter, MedicineRepository, RepositoryError};
use crate::domain::{AuditStamp, Medicine, MedicineId, NewMedicine};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MedicineRow, MedicineUpdate, NewMedicineRow};
use super::pool::DbPool;
use super::schema::medicines;

/// Diesel implementation of the medicine catalogue.
#[derive(Clone)]
pub struct DieselMedicineRepository {
    pool: DbPool,
}

impl DieselMedicineRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: MedicineFilter) -> medicines::BoxedQuery<'static, Pg> {
    let query = medicines::table.into_boxed();
    match filter {
        MedicineFilter::All => query,
        MedicineFilter::Id(id) => query.filter(medicines::id.eq(id.get())),
        MedicineFilter::Title(title) => query.filter(medicines::title.eq(title)),
    }
}

#[async_trait]
impl MedicineRepository for DieselMedicineRepository {
    async fn get_by_id(&self, id: MedicineId) -> Result<Option<Medicine>, RepositoryError> {
        self.get_single_by_filter(MedicineFilter::Id(id)).await
    }

    async fn get_all(&self, filter: MedicineFilter) -> Result<Vec<Medicine>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MedicineRow> = filtered(filter)
            .order(medicines::id.asc())
            .select(MedicineRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Medicine::from).collect())
    }

    async fn get_single_by_filter(
        &self,
        filter: MedicineFilter,
    ) -> Result<Option<Medicine>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MedicineRow> = filtered(filter)
            .order(medicines::id.asc())
            .select(MedicineRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Medicine::from))
    }

    async fn add(
        &self,
        medicine: NewMedicine,
        stamp: AuditStamp,
    ) -> Result<Medicine, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMedicineRow {
            title: medicine.title(),
            description: medicine.description(),
            created_by: &stamp.created_by,
            created: stamp.created,
        };
        let stored: MedicineRow = diesel::insert_into(medicines::table)
            .values(&row)
            .returning(MedicineRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update(&self, medicine: &Medicine) -> Result<Option<Medicine>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<MedicineRow> = diesel::update(medicines::table.find(medicine.id.get()))
            .set(MedicineUpdate::from(medicine))
            .returning(MedicineRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(stored.map(Medicine::from))
    }

    async fn delete(&self, id: MedicineId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(medicines::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
