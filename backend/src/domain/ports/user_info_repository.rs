//! Driven port for patient and employee profiles.

use async_trait::async_trait;

use crate::domain::{AppUserId, AuditStamp, UserInfo, UserInfoDraft, UserInfoId};

use super::RepositoryError;

/// Row selection for profile reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInfoFilter {
    All,
    Id(UserInfoId),
    /// The profile linked to this identity principal.
    AppUser(AppUserId),
}

/// Port for profile storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserInfoRepository: Send + Sync {
    async fn get_by_id(&self, id: UserInfoId) -> Result<Option<UserInfo>, RepositoryError>;

    async fn get_all(&self, filter: UserInfoFilter) -> Result<Vec<UserInfo>, RepositoryError>;

    async fn get_single_by_filter(
        &self,
        filter: UserInfoFilter,
    ) -> Result<Option<UserInfo>, RepositoryError>;

    async fn add(
        &self,
        details: UserInfoDraft,
        app_user_id: Option<AppUserId>,
        stamp: AuditStamp,
    ) -> Result<UserInfo, RepositoryError>;

    /// Persist the editable columns and update stamp; `None` when no row matched.
    async fn update(&self, user_info: &UserInfo) -> Result<Option<UserInfo>, RepositoryError>;

    async fn delete(&self, id: UserInfoId) -> Result<bool, RepositoryError>;
}
