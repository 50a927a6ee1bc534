//! Disease history service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::ports::{
    DiseaseHistoryFilter, DiseaseHistoryRelation, DiseaseHistoryRepository,
    DiseaseHistoryService, Includes,
};
use super::service_errors::{map_repository_error, not_found};
use super::{
    Actor, AuditStamp, DiseaseHistory, DiseaseHistoryDetails, DiseaseHistoryId, Error,
    NewDiseaseHistory, UserInfoId, UserName,
};

/// [`DiseaseHistoryService`] backed by a [`DiseaseHistoryRepository`].
#[derive(Clone)]
pub struct DiseaseHistoryServiceImpl<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DiseaseHistoryServiceImpl<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn with_patient() -> Includes<DiseaseHistoryRelation> {
    Includes::of([DiseaseHistoryRelation::Patient])
}

impl<R> DiseaseHistoryServiceImpl<R>
where
    R: DiseaseHistoryRepository,
{
    async fn load(&self, id: DiseaseHistoryId) -> Result<DiseaseHistory, Error> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("disease history", id))
    }
}

#[async_trait]
impl<R> DiseaseHistoryService for DiseaseHistoryServiceImpl<R>
where
    R: DiseaseHistoryRepository,
{
    async fn get_disease_history_by_id(
        &self,
        id: DiseaseHistoryId,
    ) -> Result<DiseaseHistoryDetails, Error> {
        self.repo
            .get_single_by_filter(DiseaseHistoryFilter::Id(id), with_patient())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("disease history", id))
    }

    async fn get_disease_history_by_patient_id(
        &self,
        patient_info_id: UserInfoId,
    ) -> Result<DiseaseHistoryDetails, Error> {
        self.repo
            .get_single_by_filter(DiseaseHistoryFilter::Patient(patient_info_id), with_patient())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                Error::not_found(format!("no disease history for patient {patient_info_id}"))
            })
    }

    async fn get_all_disease_histories(&self) -> Result<Vec<DiseaseHistoryDetails>, Error> {
        self.repo
            .get_all(DiseaseHistoryFilter::All, with_patient())
            .await
            .map_err(map_repository_error)
    }

    async fn get_disease_histories_by_username(
        &self,
        user_name: &UserName,
    ) -> Result<Vec<DiseaseHistoryDetails>, Error> {
        self.repo
            .get_all(
                DiseaseHistoryFilter::PatientUserName(user_name.clone()),
                with_patient(),
            )
            .await
            .map_err(map_repository_error)
    }

    async fn add_disease_history(
        &self,
        history: NewDiseaseHistory,
        actor: &Actor,
    ) -> Result<DiseaseHistory, Error> {
        let stamp = AuditStamp::created(actor, self.clock.as_ref());
        self.repo
            .add(history, stamp)
            .await
            .map_err(map_repository_error)
    }

    async fn update_disease_history(
        &self,
        id: DiseaseHistoryId,
        history: NewDiseaseHistory,
        actor: &Actor,
    ) -> Result<DiseaseHistory, Error> {
        let mut current = self.load(id).await?;
        history.apply_to(&mut current);
        current.audit = current.audit.touched(actor, self.clock.as_ref());
        self.repo
            .update(&current)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("disease history", id))
    }
}
