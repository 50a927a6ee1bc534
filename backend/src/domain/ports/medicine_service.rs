//! Driving port for the medicine catalogue.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Medicine, MedicineId, NewMedicine};

/// Catalogue use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicineService: Send + Sync {
    async fn get_medicines(&self) -> Result<Vec<Medicine>, Error>;

    /// Fails with `not_found` for an unknown id.
    async fn get_medicine_by_id(&self, id: MedicineId) -> Result<Medicine, Error>;

    async fn add_medicine(&self, medicine: NewMedicine, actor: &Actor) -> Result<Medicine, Error>;

    async fn update_medicine(
        &self,
        id: MedicineId,
        medicine: NewMedicine,
        actor: &Actor,
    ) -> Result<Medicine, Error>;

    /// Fails with `not_found` for an unknown id and `invalid_request` while
    /// treatments still reference the medicine.
    async fn delete_medicine(&self, id: MedicineId) -> Result<(), Error>;
}
