//! Treatment service, including treatment completion.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::ports::{
    Includes, TreatmentFilter, TreatmentRelation, TreatmentRepository, TreatmentService,
};
use super::service_errors::{map_repository_error, not_found};
use super::{
    Actor, AuditStamp, DiseaseHistoryId, Error, NewTreatment, Treatment, TreatmentDetails,
    TreatmentId,
};

/// [`TreatmentService`] backed by a [`TreatmentRepository`].
#[derive(Clone)]
pub struct TreatmentServiceImpl<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TreatmentServiceImpl<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> TreatmentServiceImpl<R>
where
    R: TreatmentRepository,
{
    async fn load(&self, id: TreatmentId) -> Result<Treatment, Error> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("treatment", id))
    }

    async fn persist(&self, treatment: &Treatment) -> Result<Treatment, Error> {
        self.repo
            .update(treatment)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("treatment", treatment.id))
    }
}

#[async_trait]
impl<R> TreatmentService for TreatmentServiceImpl<R>
where
    R: TreatmentRepository,
{
    async fn get_treatment_by_id(&self, id: TreatmentId) -> Result<TreatmentDetails, Error> {
        let includes = Includes::of([TreatmentRelation::Medicine, TreatmentRelation::DiseaseHistory]);
        self.repo
            .get_single_by_filter(TreatmentFilter::Id(id), includes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("treatment", id))
    }

    async fn get_treatments_by_disease_history_id(
        &self,
        disease_history_id: DiseaseHistoryId,
    ) -> Result<Vec<TreatmentDetails>, Error> {
        let includes = Includes::of([
            TreatmentRelation::Medicine,
            TreatmentRelation::DiseaseHistory,
            TreatmentRelation::Patient,
        ]);
        self.repo
            .get_all(TreatmentFilter::DiseaseHistory(disease_history_id), includes)
            .await
            .map_err(map_repository_error)
    }

    async fn add_treatment(
        &self,
        treatment: NewTreatment,
        actor: &Actor,
    ) -> Result<Treatment, Error> {
        let stamp = AuditStamp::created(actor, self.clock.as_ref());
        self.repo
            .add(treatment, stamp)
            .await
            .map_err(map_repository_error)
    }

    async fn update_treatment(
        &self,
        id: TreatmentId,
        treatment: NewTreatment,
        actor: &Actor,
    ) -> Result<Treatment, Error> {
        let mut current = self.load(id).await?;
        treatment.apply_to(&mut current);
        current.audit = current.audit.touched(actor, self.clock.as_ref());
        self.persist(&current).await
    }

    async fn complete_treatment(
        &self,
        id: TreatmentId,
        actor: &Actor,
    ) -> Result<Treatment, Error> {
        let mut current = self.load(id).await?;
        if !current.complete() {
            debug!(treatment_id = %id, "treatment already completed");
            return Ok(current);
        }
        current.audit = current.audit.touched(actor, self.clock.as_ref());
        self.persist(&current).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::FixtureClock;
    use crate::domain::ports::MockTreatmentRepository;
    use crate::domain::{Dosing, ErrorCode, MedicineId};
    use rstest::rstest;

    fn stored(is_completed: bool) -> Treatment {
        Treatment {
            id: TreatmentId::from_stored(7),
            medicine_id: MedicineId::from_stored(1),
            disease_history_id: DiseaseHistoryId::from_stored(2),
            diagnosis: "Dehydration".to_owned(),
            dosing: Dosing::from_stored(1.0, 500.0, 2.0),
            is_completed,
            audit: AuditStamp::created(&Actor::seed(), &FixtureClock::at_hour(8)),
        }
    }

    fn service(repo: MockTreatmentRepository) -> TreatmentServiceImpl<MockTreatmentRepository> {
        TreatmentServiceImpl::new(Arc::new(repo), Arc::new(FixtureClock::at_hour(14)))
    }

    #[tokio::test]
    async fn completing_open_treatment_persists_flag() {
        let mut repo = MockTreatmentRepository::new();
        repo.expect_get_by_id()
            .times(1)
            .return_once(|_| Ok(Some(stored(false))));
        repo.expect_update()
            .withf(|row| {
                row.is_completed && row.audit.updated_by.as_deref() == Some("medEmployee1@test.com")
            })
            .times(1)
            .return_once(|row| Ok(Some(row.clone())));

        let completed = service(repo)
            .complete_treatment(
                TreatmentId::from_stored(7),
                &Actor::new("medEmployee1@test.com"),
            )
            .await
            .expect("completion");
        assert!(completed.is_completed);
    }

    #[tokio::test]
    async fn completing_twice_skips_the_write() {
        let mut repo = MockTreatmentRepository::new();
        repo.expect_get_by_id()
            .times(1)
            .return_once(|_| Ok(Some(stored(true))));
        repo.expect_update().never();

        let completed = service(repo)
            .complete_treatment(TreatmentId::from_stored(7), &Actor::seed())
            .await
            .expect("no-op completion");
        assert!(completed.is_completed);
        assert!(completed.audit.updated.is_none());
    }

    #[tokio::test]
    async fn completing_missing_treatment_is_not_found() {
        let mut repo = MockTreatmentRepository::new();
        repo.expect_get_by_id().times(1).return_once(|_| Ok(None));

        let err = service(repo)
            .complete_treatment(TreatmentId::from_stored(70), &Actor::seed())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(TreatmentRelation::Medicine, true)]
    #[case(TreatmentRelation::DiseaseHistory, true)]
    #[case(TreatmentRelation::Patient, true)]
    #[tokio::test]
    async fn history_listing_includes_related_records(
        #[case] relation: TreatmentRelation,
        #[case] expected: bool,
    ) {
        let mut repo = MockTreatmentRepository::new();
        repo.expect_get_all()
            .withf(move |filter, includes| {
                *filter == TreatmentFilter::DiseaseHistory(DiseaseHistoryId::from_stored(2))
                    && includes.contains(relation) == expected
            })
            .times(1)
            .return_once(|_, _| Ok(vec![TreatmentDetails::bare(stored(false))]));

        let treatments = service(repo)
            .get_treatments_by_disease_history_id(DiseaseHistoryId::from_stored(2))
            .await
            .expect("treatments");
        assert_eq!(treatments.len(), 1);
    }

    #[tokio::test]
    async fn single_read_skips_patient_relation() {
        let mut repo = MockTreatmentRepository::new();
        repo.expect_get_single_by_filter()
            .withf(|_, includes| {
                includes.contains(TreatmentRelation::Medicine)
                    && !includes.contains(TreatmentRelation::Patient)
            })
            .times(1)
            .return_once(|_, _| Ok(Some(TreatmentDetails::bare(stored(false)))));

        service(repo)
            .get_treatment_by_id(TreatmentId::from_stored(7))
            .await
            .expect("treatment");
    }
}
