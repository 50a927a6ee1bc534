//! Driving port for profiles.

use async_trait::async_trait;

use crate::domain::{Actor, AppUserId, Error, UserInfo, UserInfoDraft, UserInfoId};

/// Profile use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserInfoService: Send + Sync {
    async fn get_user_info_by_id(&self, id: UserInfoId) -> Result<UserInfo, Error>;

    /// Profile linked to the given principal.
    async fn get_user_info_by_app_user(&self, app_user_id: AppUserId) -> Result<UserInfo, Error>;

    async fn update_user_info(
        &self,
        id: UserInfoId,
        details: UserInfoDraft,
        actor: &Actor,
    ) -> Result<UserInfo, Error>;
}
