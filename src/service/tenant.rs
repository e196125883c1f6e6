//! Tenant listing for the impersonation switcher

use super::stored_profile;
use crate::domain::Tenant;
use crate::error::{AppError, Result};
use crate::repository::{ProfileRepository, TenantRepository};
use crate::session::SessionState;
use std::sync::Arc;

pub struct TenantService<R: TenantRepository, PR: ProfileRepository> {
    repo: Arc<R>,
    profile_repo: Arc<PR>,
}

impl<R: TenantRepository, PR: ProfileRepository> TenantService<R, PR> {
    pub fn new(repo: Arc<R>, profile_repo: Arc<PR>) -> Self {
        Self { repo, profile_repo }
    }

    /// All tenants ordered by name. Super-admin only, checked against the
    /// stored profile.
    pub async fn list_for_switcher(&self, session: &SessionState) -> Result<Vec<Tenant>> {
        let profile = stored_profile(self.profile_repo.as_ref(), session).await?;
        if !profile.is_super_admin {
            return Err(AppError::Forbidden(
                "Super-admin privileges are required to list tenants".to_string(),
            ));
        }
        self.repo.list_by_name().await
    }
}
