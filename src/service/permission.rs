//! Tenant permission business logic

use crate::domain::{
    PermissionFields, PermissionMatrixEntry, Profile, SetPermissionInput, StringUuid,
    TenantPermission,
};
use crate::error::{AppError, Result};
use crate::policy::{self, keys, PermissionRegistry, TenantPermissionSet};
use crate::repository::PermissionRepository;
use crate::session::SessionState;
use crate::telemetry::metrics::{
    record_permission_check, record_permission_store_error, record_permission_update,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

pub struct PermissionService<P: PermissionRepository> {
    repo: Arc<P>,
    registry: PermissionRegistry,
}

impl<P: PermissionRepository> PermissionService<P> {
    pub fn new(repo: Arc<P>) -> Self {
        Self {
            repo,
            registry: PermissionRegistry,
        }
    }

    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    /// Rows of the profile's effective tenant, resolved once at call time.
    pub async fn load_for(&self, profile: &Profile) -> Result<TenantPermissionSet> {
        let tenant_id = profile.effective_tenant_id();
        let rows = self.repo.list_by_tenant(tenant_id).await?;
        Ok(TenantPermissionSet::new(tenant_id, rows))
    }

    /// Fail-closed capability check for the session's effective tenant.
    pub async fn has_permission(&self, session: &SessionState, permission_key: &str) -> bool {
        let Ok(profile) = session.profile() else {
            record_permission_check(false);
            return false;
        };

        // Super-admins never need the rows
        if profile.is_super_admin {
            record_permission_check(true);
            return true;
        }

        let set = match self.load_for(profile).await {
            Ok(set) => set,
            Err(e) => {
                warn!(
                    profile_id = %profile.id,
                    tenant_id = %profile.effective_tenant_id(),
                    permission_key,
                    error = %e,
                    "permission rows unavailable, denying"
                );
                record_permission_store_error();
                return false;
            }
        };

        let granted = policy::is_granted(profile, permission_key, &set, Utc::now());
        record_permission_check(granted);
        granted
    }

    /// Quota ceiling configured for the session's effective tenant.
    pub async fn quota_limit(&self, session: &SessionState, permission_key: &str) -> Result<i32> {
        let profile = session.profile()?;
        let set = self.load_for(profile).await?;
        Ok(policy::quota_limit(permission_key, &set))
    }

    /// Every catalog entry joined with the effective tenant's row for it.
    pub async fn matrix(&self, session: &SessionState) -> Result<Vec<PermissionMatrixEntry>> {
        let profile = session.profile()?;
        let set = self.load_for(profile).await?;
        let now = Utc::now();

        Ok(self
            .registry
            .list_definitions()
            .iter()
            .map(|definition| match set.get(definition.key) {
                Some(row) => PermissionMatrixEntry {
                    definition: *definition,
                    enabled: row.enabled,
                    limit_count: row.limit_count,
                    active: row.is_active_at(now),
                    configured: true,
                },
                None => PermissionMatrixEntry {
                    definition: *definition,
                    enabled: false,
                    limit_count: 0,
                    active: false,
                    configured: false,
                },
            })
            .collect())
    }

    /// Idempotent upsert keyed by `(tenant_id, permission_key)`.
    ///
    /// A unique-key collision with a concurrent insert is retried once as a
    /// plain update. Any remaining failure surfaces as `UpdateFailed`.
    pub async fn set_permission(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        enabled: bool,
        limit_count: i32,
    ) -> Result<TenantPermission> {
        let fields = PermissionFields {
            enabled,
            limit_count,
        };

        let result = match self.repo.upsert(tenant_id, permission_key, fields).await {
            Ok(row) => Ok((row, "upserted")),
            Err(AppError::Conflict(reason)) => {
                debug!(%tenant_id, permission_key, %reason, "upsert collided, retrying as update");
                match self.repo.update(tenant_id, permission_key, fields).await {
                    Ok(Some(row)) => Ok((row, "retried")),
                    Ok(None) => Err(AppError::NotFound(format!(
                        "permission '{}' for tenant {}",
                        permission_key, tenant_id
                    ))),
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };

        match result {
            Ok((row, outcome)) => {
                record_permission_update(outcome);
                info!(
                    %tenant_id,
                    permission_key,
                    enabled,
                    limit_count,
                    "tenant permission updated"
                );
                Ok(row)
            }
            Err(source) => {
                record_permission_update("failed");
                warn!(%tenant_id, permission_key, error = %source, "tenant permission update failed");
                Err(AppError::UpdateFailed {
                    key: permission_key.to_string(),
                    source: Box::new(source),
                })
            }
        }
    }

    /// Edit one capability of the caller's effective tenant.
    pub async fn update_for_session(
        &self,
        session: &SessionState,
        input: SetPermissionInput,
    ) -> Result<TenantPermission> {
        let profile = session.profile()?;
        input.validate()?;

        if !self.registry.contains(&input.permission_key) {
            return Err(AppError::Validation(format!(
                "Unknown permission key '{}'",
                input.permission_key
            )));
        }

        if !profile.is_super_admin {
            let set = self.load_for(profile).await?;
            if !policy::is_granted(profile, keys::CAN_EDIT_PERMISSIONS, &set, Utc::now()) {
                return Err(AppError::Forbidden(format!(
                    "{} is required to edit permissions",
                    keys::CAN_EDIT_PERMISSIONS
                )));
            }
        }

        let fields = input.fields();
        self.set_permission(
            profile.effective_tenant_id(),
            &input.permission_key,
            fields.enabled,
            fields.limit_count,
        )
        .await
    }
}
