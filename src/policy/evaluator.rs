//! Permission evaluation over one tenant's permission rows.
//!
//! Pure logic: no I/O, no clock reads. Callers fetch the rows for the
//! effective tenant and pass the instant to evaluate at.

use crate::domain::{Profile, StringUuid, TenantPermission};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Permission rows belonging to exactly one tenant
#[derive(Debug, Clone)]
pub struct TenantPermissionSet {
    tenant_id: StringUuid,
    rows: HashMap<String, TenantPermission>,
}

impl TenantPermissionSet {
    /// Rows scoped to `tenant_id`; rows of any other tenant are discarded.
    pub fn new(tenant_id: StringUuid, rows: Vec<TenantPermission>) -> Self {
        let rows = rows
            .into_iter()
            .filter(|row| row.tenant_id == tenant_id)
            .map(|row| (row.permission_key.clone(), row))
            .collect();
        Self { tenant_id, rows }
    }

    pub fn empty(tenant_id: StringUuid) -> Self {
        Self {
            tenant_id,
            rows: HashMap::new(),
        }
    }

    pub fn tenant_id(&self) -> StringUuid {
        self.tenant_id
    }

    pub fn get(&self, permission_key: &str) -> Option<&TenantPermission> {
        self.rows.get(permission_key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &TenantPermission> {
        self.rows.values()
    }
}

/// Why a capability was granted or denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    SuperAdmin,
    Enabled,
    NotConfigured,
    NotYetValid,
    Expired,
    Disabled,
    /// The rows belong to a tenant other than the profile's effective tenant
    TenantMismatch,
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::SuperAdmin | Decision::Enabled)
    }
}

/// Evaluate `permission_key` for `profile`.
///
/// Order matters: the super-admin bypass comes first, and the validity
/// window is checked before `enabled`, so an expired row denies whether or
/// not it is enabled.
pub fn evaluate(
    profile: &Profile,
    permission_key: &str,
    rows: &TenantPermissionSet,
    now: DateTime<Utc>,
) -> Decision {
    if profile.is_super_admin {
        return Decision::SuperAdmin;
    }

    if rows.tenant_id() != profile.effective_tenant_id() {
        return Decision::TenantMismatch;
    }

    let Some(row) = rows.get(permission_key) else {
        return Decision::NotConfigured;
    };

    if now < row.valid_from {
        return Decision::NotYetValid;
    }
    if let Some(until) = row.valid_until {
        if now >= until {
            return Decision::Expired;
        }
    }

    if row.enabled {
        Decision::Enabled
    } else {
        Decision::Disabled
    }
}

/// Whether `profile` holds `permission_key` at `now`. Never fails: missing
/// data denies.
pub fn is_granted(
    profile: &Profile,
    permission_key: &str,
    rows: &TenantPermissionSet,
    now: DateTime<Utc>,
) -> bool {
    let decision = evaluate(profile, permission_key, rows, now);
    debug!(
        profile_id = %profile.id,
        tenant_id = %rows.tenant_id(),
        permission_key,
        ?decision,
        "permission evaluated"
    );
    decision.is_granted()
}

/// Configured quota ceiling for `permission_key`, 0 when unconfigured.
///
/// Ignores the validity window and the `enabled` flag so the ceiling shown
/// next to a temporarily disabled capability stays stable.
pub fn quota_limit(permission_key: &str, rows: &TenantPermissionSet) -> i32 {
    rows.get(permission_key)
        .map(|row| row.limit_count)
        .unwrap_or(0)
}
