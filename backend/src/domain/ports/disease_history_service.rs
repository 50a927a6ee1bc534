//! Driving port for disease histories.

use async_trait::async_trait;

use crate::domain::{
    Actor, DiseaseHistory, DiseaseHistoryDetails, DiseaseHistoryId, Error, NewDiseaseHistory,
    UserInfoId, UserName,
};

/// Disease history use-cases consumed by inbound adapters.
///
/// Every read returns the patient profile alongside the history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiseaseHistoryService: Send + Sync {
    async fn get_disease_history_by_id(
        &self,
        id: DiseaseHistoryId,
    ) -> Result<DiseaseHistoryDetails, Error>;

    /// First history of the patient by id order.
    async fn get_disease_history_by_patient_id(
        &self,
        patient_info_id: UserInfoId,
    ) -> Result<DiseaseHistoryDetails, Error>;

    async fn get_all_disease_histories(&self) -> Result<Vec<DiseaseHistoryDetails>, Error>;

    /// Histories whose patient profile belongs to the named principal.
    async fn get_disease_histories_by_username(
        &self,
        user_name: &UserName,
    ) -> Result<Vec<DiseaseHistoryDetails>, Error>;

    async fn add_disease_history(
        &self,
        history: NewDiseaseHistory,
        actor: &Actor,
    ) -> Result<DiseaseHistory, Error>;

    async fn update_disease_history(
        &self,
        id: DiseaseHistoryId,
        history: NewDiseaseHistory,
        actor: &Actor,
    ) -> Result<DiseaseHistory, Error>;
}
