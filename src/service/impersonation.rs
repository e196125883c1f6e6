//! Tenant impersonation controller
//!
//! Two states over a profile's `impersonate_tenant_id`: Normal (unset) and
//! Impersonating (set). Only super-admins may enter Impersonating, and the
//! check runs against the stored profile rather than the caller's copy.

use super::stored_profile;
use crate::audit::AuditDispatcher;
use crate::domain::{AuditAction, AuditEntry, Profile, StringUuid};
use crate::error::{AppError, Result};
use crate::repository::{ProfileRepository, TenantRepository};
use crate::session::SessionState;
use crate::telemetry::metrics::record_impersonation;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ImpersonationService<PR: ProfileRepository, TR: TenantRepository> {
    profile_repo: Arc<PR>,
    tenant_repo: Arc<TR>,
    audit: AuditDispatcher,
}

impl<PR: ProfileRepository, TR: TenantRepository> ImpersonationService<PR, TR> {
    pub fn new(profile_repo: Arc<PR>, tenant_repo: Arc<TR>, audit: AuditDispatcher) -> Self {
        Self {
            profile_repo,
            tenant_repo,
            audit,
        }
    }

    /// Switch the caller's effective tenant to `target_tenant_id`.
    ///
    /// Nothing is written unless the caller is a super-admin and the target
    /// tenant exists.
    pub async fn impersonate_tenant(
        &self,
        session: &SessionState,
        target_tenant_id: StringUuid,
    ) -> Result<Profile> {
        let current = stored_profile(self.profile_repo.as_ref(), session).await?;

        if !current.is_super_admin {
            warn!(
                profile_id = %current.id,
                target_tenant_id = %target_tenant_id,
                "impersonation rejected for non super-admin"
            );
            record_impersonation("denied");
            return Err(AppError::Forbidden(
                "Super-admin privileges are required to impersonate a tenant".to_string(),
            ));
        }

        if self.tenant_repo.find_by_id(target_tenant_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Tenant {} not found",
                target_tenant_id
            )));
        }

        let updated = self
            .profile_repo
            .set_impersonation(current.id, Some(target_tenant_id))
            .await?;

        info!(
            profile_id = %updated.id,
            home_tenant_id = %updated.tenant_id,
            target_tenant_id = %target_tenant_id,
            "tenant impersonation started"
        );
        record_impersonation(AuditAction::ImpersonateTenant.as_str());

        self.audit.record(
            AuditEntry::for_profile(&updated, AuditAction::ImpersonateTenant)
                .with_resource("tenant", Some(target_tenant_id.to_string()))
                .with_details(json!({ "original_tenant_id": updated.tenant_id })),
        );

        Ok(updated)
    }

    /// Return to the home tenant. The store is left untouched when not
    /// impersonating, but the stop is still audited.
    pub async fn stop_impersonation(&self, session: &SessionState) -> Result<Profile> {
        let current = stored_profile(self.profile_repo.as_ref(), session).await?;

        let previous = current.impersonate_tenant_id;
        let updated = if current.is_impersonating() {
            self.profile_repo.set_impersonation(current.id, None).await?
        } else {
            current
        };

        info!(
            profile_id = %updated.id,
            home_tenant_id = %updated.tenant_id,
            previous_tenant_id = ?previous,
            "tenant impersonation stopped"
        );
        record_impersonation(AuditAction::StopImpersonation.as_str());

        self.audit.record(
            AuditEntry::for_profile(&updated, AuditAction::StopImpersonation)
                .with_resource("tenant", None),
        );

        Ok(updated)
    }
}
