//! Tenant permission domain models

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Compiled-in catalog entry for one capability key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    /// Stable capability key (e.g., "can_post_job")
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Whether the capability carries a numeric usage ceiling
    pub has_quota: bool,
}

/// Per-tenant permission override row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TenantPermission {
    pub id: StringUuid,
    pub tenant_id: StringUuid,
    pub permission_key: String,
    pub enabled: bool,
    pub limit_count: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantPermission {
    /// Row that `set_permission` creates on first edit of a key.
    pub fn new(
        tenant_id: StringUuid,
        permission_key: impl Into<String>,
        fields: PermissionFields,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StringUuid::new_v4(),
            tenant_id,
            permission_key: permission_key.into(),
            enabled: fields.enabled,
            limit_count: fields.limit_count,
            valid_from: now,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `valid_from <= now < valid_until` (open-ended when `valid_until` is unset).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if now < self.valid_from {
            return false;
        }
        match self.valid_until {
            Some(until) => now < until,
            None => true,
        }
    }
}

/// Mutable surface of a permission row: the toggle and the quota edit.
///
/// `valid_from`/`valid_until` are never written through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFields {
    pub enabled: bool,
    pub limit_count: i32,
}

/// Input for editing one capability of the caller's effective tenant
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetPermissionInput {
    #[validate(length(min = 1, max = 100))]
    pub permission_key: String,
    pub enabled: bool,
    #[validate(range(min = 0))]
    pub limit_count: i32,
}

impl SetPermissionInput {
    pub fn fields(&self) -> PermissionFields {
        PermissionFields {
            enabled: self.enabled,
            limit_count: self.limit_count,
        }
    }
}

/// One row of the permission matrix: a catalog entry joined with its tenant row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionMatrixEntry {
    pub definition: PermissionDefinition,
    pub enabled: bool,
    pub limit_count: i32,
    /// Whether the configured row is currently inside its validity window
    pub active: bool,
    pub configured: bool,
}
