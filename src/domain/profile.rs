//! Profile and identity domain models

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Authenticated identity as reported by the hosted auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: StringUuid,
    pub email: Option<String>,
}

/// Console profile attached to an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: StringUuid,
    /// Home tenant
    pub tenant_id: StringUuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub is_super_admin: bool,
    /// Set only by the impersonation controller, on a super-admin's own profile
    pub impersonate_tenant_id: Option<StringUuid>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Tenant whose data and permissions currently apply.
    pub fn effective_tenant_id(&self) -> StringUuid {
        self.impersonate_tenant_id.unwrap_or(self.tenant_id)
    }

    pub fn is_impersonating(&self) -> bool {
        self.impersonate_tenant_id.is_some()
    }

    /// Home tenant, reported only while acting under impersonation.
    pub fn impersonated_from(&self) -> Option<StringUuid> {
        self.impersonate_tenant_id.map(|_| self.tenant_id)
    }
}

impl Default for Profile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            tenant_id: StringUuid::new_v4(),
            email: String::new(),
            full_name: String::new(),
            avatar_url: None,
            phone: None,
            position: None,
            department: None,
            is_super_admin: false,
            impersonate_tenant_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_tenant_is_home_when_not_impersonating() {
        let profile = Profile::default();
        assert_eq!(profile.effective_tenant_id(), profile.tenant_id);
        assert!(!profile.is_impersonating());
        assert!(profile.impersonated_from().is_none());
    }

    #[test]
    fn test_effective_tenant_follows_impersonation() {
        let target = StringUuid::new_v4();
        let profile = Profile {
            is_super_admin: true,
            impersonate_tenant_id: Some(target),
            ..Default::default()
        };
        assert_eq!(profile.effective_tenant_id(), target);
        assert_eq!(profile.impersonated_from(), Some(profile.tenant_id));
    }
}
