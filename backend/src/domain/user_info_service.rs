//! Profile service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use super::ports::{UserInfoFilter, UserInfoRepository, UserInfoService};
use super::service_errors::{map_repository_error, not_found};
use super::{Actor, AppUserId, Error, UserInfo, UserInfoDraft, UserInfoId};

/// [`UserInfoService`] backed by a [`UserInfoRepository`].
#[derive(Clone)]
pub struct UserInfoServiceImpl<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserInfoServiceImpl<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> UserInfoService for UserInfoServiceImpl<R>
where
    R: UserInfoRepository,
{
    async fn get_user_info_by_id(&self, id: UserInfoId) -> Result<UserInfo, Error> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("user info", id))
    }

    async fn get_user_info_by_app_user(&self, app_user_id: AppUserId) -> Result<UserInfo, Error> {
        self.repo
            .get_single_by_filter(UserInfoFilter::AppUser(app_user_id))
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("no profile for user {app_user_id}")))
    }

    async fn update_user_info(
        &self,
        id: UserInfoId,
        details: UserInfoDraft,
        actor: &Actor,
    ) -> Result<UserInfo, Error> {
        let mut current = self.get_user_info_by_id(id).await?;
        current.details = details;
        current.audit = current.audit.touched(actor, self.clock.as_ref());
        self.repo
            .update(&current)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found("user info", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserInfoRepository;
    use crate::domain::test_support::FixtureClock;
    use crate::domain::{AuditStamp, ErrorCode};

    fn stored(app_user_id: Option<AppUserId>) -> UserInfo {
        UserInfo {
            id: UserInfoId::from_stored(1),
            app_user_id,
            details: UserInfoDraft {
                email: "patient1@test.com".to_owned(),
                first_name: Some("First name 1".to_owned()),
                ..UserInfoDraft::default()
            },
            audit: AuditStamp::created(&Actor::seed(), &FixtureClock::at_hour(8)),
        }
    }

    fn service(repo: MockUserInfoRepository) -> UserInfoServiceImpl<MockUserInfoRepository> {
        UserInfoServiceImpl::new(Arc::new(repo), Arc::new(FixtureClock::at_hour(11)))
    }

    #[tokio::test]
    async fn profile_lookup_by_principal_uses_app_user_filter() {
        let owner = AppUserId::random();
        let mut repo = MockUserInfoRepository::new();
        repo.expect_get_single_by_filter()
            .withf(move |filter| *filter == UserInfoFilter::AppUser(owner))
            .times(1)
            .return_once(move |_| Ok(Some(stored(Some(owner)))));

        let profile = service(repo)
            .get_user_info_by_app_user(owner)
            .await
            .expect("profile");
        assert_eq!(profile.app_user_id, Some(owner));
    }

    #[tokio::test]
    async fn update_replaces_details_but_keeps_link() {
        let owner = AppUserId::random();
        let mut repo = MockUserInfoRepository::new();
        repo.expect_get_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored(Some(owner)))));
        repo.expect_update()
            .withf(move |row| {
                row.app_user_id == Some(owner)
                    && row.details.city.as_deref() == Some("Kharkiv")
                    && row.audit.updated_by.as_deref() == Some("patient1@test.com")
            })
            .times(1)
            .return_once(|row| Ok(Some(row.clone())));

        let details = UserInfoDraft {
            email: "patient1@test.com".to_owned(),
            city: Some("Kharkiv".to_owned()),
            ..UserInfoDraft::default()
        };
        service(repo)
            .update_user_info(
                UserInfoId::from_stored(1),
                details,
                &Actor::new("patient1@test.com"),
            )
            .await
            .expect("update succeeds");
    }

    #[tokio::test]
    async fn update_of_missing_profile_is_not_found() {
        let mut repo = MockUserInfoRepository::new();
        repo.expect_get_by_id().times(1).return_once(|_| Ok(None));

        let err = service(repo)
            .update_user_info(
                UserInfoId::from_stored(9),
                UserInfoDraft::default(),
                &Actor::seed(),
            )
            .await
            .expect_err("missing row");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
