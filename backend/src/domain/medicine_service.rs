//! Medicine catalogue service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::ports::{MedicineFilter, MedicineRepository, MedicineService};
use super::service_errors::{map_repository_error, not_found};
use super::{Actor, AuditStamp, Error, Medicine, MedicineId, NewMedicine};

/// [`MedicineService`] backed by a [`MedicineRepository`].
#[derive(Clone)]
pub struct MedicineServiceImpl<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> MedicineServiceImpl<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> MedicineService for MedicineServiceImpl<R>
where
    R: MedicineRepository,
{
    async fn get_medicines(&self) -> Result<Vec<Medicine>, Error> {
        self.repo
            .get_all(MedicineFilter::All)
            .await
            .map_err(map_repository_error)
    }

    async fn get_medicine_by_id(&self, id: MedicineId) -> Result<Medicine, Error> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("medicine", id))
    }

    async fn add_medicine(&self, medicine: NewMedicine, actor: &Actor) -> Result<Medicine, Error> {
        let stamp = AuditStamp::created(actor, self.clock.as_ref());
        self.repo
            .add(medicine, stamp)
            .await
            .map_err(map_repository_error)
    }

    async fn update_medicine(
        &self,
        id: MedicineId,
        medicine: NewMedicine,
        actor: &Actor,
    ) -> Result<Medicine, Error> {
        let mut current = self.get_medicine_by_id(id).await?;
        medicine.apply_to(&mut current);
        current.audit = current.audit.touched(actor, self.clock.as_ref());
        self.repo
            .update(&current)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("medicine", id))
    }

    async fn delete_medicine(&self, id: MedicineId) -> Result<(), Error> {
        let deleted = self.repo.delete(id).await.map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(not_found("medicine", id))
        }
    }
}
