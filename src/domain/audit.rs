//! Audit trail domain model

use super::common::StringUuid;
use super::profile::{Identity, Profile};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Actions that produce an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    ImpersonateTenant,
    StopImpersonation,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::ImpersonateTenant => "impersonate_tenant",
            AuditAction::StopImpersonation => "stop_impersonation",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Effective tenant at the time of the action; unknown when no profile exists
    pub tenant_id: Option<StringUuid>,
    pub user_id: Option<StringUuid>,
    pub action: AuditAction,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub details: Value,
    /// Home tenant, recorded only when acting under impersonation
    pub impersonated_from: Option<StringUuid>,
}

impl AuditEntry {
    /// Entry attributed to `profile` in its current (effective) tenant context.
    pub fn for_profile(profile: &Profile, action: AuditAction) -> Self {
        Self {
            tenant_id: Some(profile.effective_tenant_id()),
            user_id: Some(profile.id),
            action,
            resource_type: None,
            resource_id: None,
            details: json!({}),
            impersonated_from: profile.impersonated_from(),
        }
    }

    /// Entry for an identity that has no provisioned profile.
    pub fn for_identity(identity: &Identity, action: AuditAction) -> Self {
        Self {
            tenant_id: None,
            user_id: Some(identity.id),
            action,
            resource_type: None,
            resource_id: None,
            details: json!({}),
            impersonated_from: None,
        }
    }

    /// Entry with no known actor, e.g. a sign-out without a session.
    pub fn anonymous(action: AuditAction) -> Self {
        Self {
            tenant_id: None,
            user_id: None,
            action,
            resource_type: None,
            resource_id: None,
            details: json!({}),
            impersonated_from: None,
        }
    }

    pub fn with_resource(mut self, resource_type: &str, resource_id: Option<String>) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self.resource_id = resource_id;
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}
