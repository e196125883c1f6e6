//! Business logic layer

pub mod auth;
pub mod impersonation;
pub mod permission;
pub mod tenant;

pub use auth::{AuthService, SignInOutcome};
pub use impersonation::ImpersonationService;
pub use permission::PermissionService;
pub use tenant::TenantService;

use crate::domain::Profile;
use crate::error::{AppError, Result};
use crate::repository::ProfileRepository;
use crate::session::SessionState;

/// The caller's profile as stored, not the copy carried in the session.
pub(crate) async fn stored_profile<PR: ProfileRepository>(
    profile_repo: &PR,
    session: &SessionState,
) -> Result<Profile> {
    let profile = session.profile()?;
    profile_repo
        .find_by_id(profile.id)
        .await?
        .ok_or_else(|| AppError::ProfileMissing {
            identity_id: profile.id.to_string(),
        })
}
