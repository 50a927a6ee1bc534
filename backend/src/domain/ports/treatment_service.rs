//! Driving port for treatments.

use async_trait::async_trait;

use crate::domain::{
    Actor, DiseaseHistoryId, Error, NewTreatment, Treatment, TreatmentDetails, TreatmentId,
};

/// Treatment use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TreatmentService: Send + Sync {
    /// Treatment with its medicine and disease history.
    async fn get_treatment_by_id(&self, id: TreatmentId) -> Result<TreatmentDetails, Error>;

    /// Treatments of one history, each with its medicine, history and patient.
    async fn get_treatments_by_disease_history_id(
        &self,
        disease_history_id: DiseaseHistoryId,
    ) -> Result<Vec<TreatmentDetails>, Error>;

    async fn add_treatment(
        &self,
        treatment: NewTreatment,
        actor: &Actor,
    ) -> Result<Treatment, Error>;

    async fn update_treatment(
        &self,
        id: TreatmentId,
        treatment: NewTreatment,
        actor: &Actor,
    ) -> Result<Treatment, Error>;

    /// Mark a treatment completed. Completing it again changes nothing.
    async fn complete_treatment(&self, id: TreatmentId, actor: &Actor)
    -> Result<Treatment, Error>;
}
