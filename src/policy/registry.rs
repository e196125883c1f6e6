//! Static catalog of every capability key the console knows about

use crate::domain::PermissionDefinition;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub mod keys {
    pub const CAN_LOGIN: &str = "can_login";
    pub const CAN_INVITE_USER: &str = "can_invite_user";
    pub const CAN_MANAGE_TENANT: &str = "can_manage_tenant";
    pub const CAN_MANAGE_USERS: &str = "can_manage_users";
    pub const CAN_POST_JOB: &str = "can_post_job";
    pub const CAN_USE_AI_VIDEO: &str = "can_use_ai_video";
    pub const CAN_SEND_TESTS: &str = "can_send_tests";
    pub const CAN_EDIT_PERMISSIONS: &str = "can_edit_permissions";
    pub const CAN_VIEW_AUDIT_LOGS: &str = "can_view_audit_logs";
    pub const CAN_CUSTOMIZE_BRANDING: &str = "can_customize_branding";
    pub const CAN_SEND_LANGUAGE_TEST: &str = "can_send_language_test";
    pub const CAN_MANAGE_ROLES: &str = "can_manage_roles";
    pub const CAN_VIEW_SYSTEM_HEALTH: &str = "can_view_system_health";
}

const fn def(
    key: &'static str,
    label: &'static str,
    description: &'static str,
    has_quota: bool,
) -> PermissionDefinition {
    PermissionDefinition {
        key,
        label,
        description,
        has_quota,
    }
}

/// Display order of the permission matrix.
pub static DEFAULT_DEFINITIONS: [PermissionDefinition; 13] = [
    def(keys::CAN_LOGIN, "Login Access", "Basic login capability", false),
    def(keys::CAN_INVITE_USER, "Invite Users", "Ability to invite new users", false),
    def(keys::CAN_MANAGE_TENANT, "Manage Tenant", "Tenant settings and configuration", false),
    def(keys::CAN_MANAGE_USERS, "Manage Users", "User management and roles", false),
    def(keys::CAN_POST_JOB, "Post Jobs", "Create and manage job postings", true),
    def(keys::CAN_USE_AI_VIDEO, "AI Video Interviews", "Use AI-powered video interviews", true),
    def(keys::CAN_SEND_TESTS, "Send Assessments", "Send personality and skill tests", true),
    def(keys::CAN_EDIT_PERMISSIONS, "Edit Permissions", "Modify permission settings", false),
    def(keys::CAN_VIEW_AUDIT_LOGS, "View Audit Logs", "Access system audit logs", false),
    def(keys::CAN_CUSTOMIZE_BRANDING, "Customize Branding", "Change tenant branding", false),
    def(keys::CAN_SEND_LANGUAGE_TEST, "Language Tests", "Send language proficiency tests", false),
    def(keys::CAN_MANAGE_ROLES, "Manage Roles", "Create and modify user roles", false),
    def(
        keys::CAN_VIEW_SYSTEM_HEALTH,
        "View System Health",
        "Monitor system services and performance",
        false,
    ),
];

lazy_static! {
    static ref DEFAULT_INDEX: HashMap<&'static str, usize> = DEFAULT_DEFINITIONS
        .iter()
        .enumerate()
        .map(|(i, d)| (d.key, i))
        .collect();
}

/// Read-only view over the catalog fixed at process start
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionRegistry;

impl PermissionRegistry {
    pub fn list_definitions(&self) -> &'static [PermissionDefinition] {
        &DEFAULT_DEFINITIONS
    }

    pub fn get(&self, key: &str) -> Option<&'static PermissionDefinition> {
        DEFAULT_INDEX.get(key).map(|&i| &DEFAULT_DEFINITIONS[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        DEFAULT_INDEX.contains_key(key)
    }

    /// Case-insensitive match on label or description, catalog order kept.
    pub fn search(&self, term: &str) -> Vec<&'static PermissionDefinition> {
        let needle = term.trim().to_lowercase();
        DEFAULT_DEFINITIONS
            .iter()
            .filter(|d| {
                needle.is_empty()
                    || d.label.to_lowercase().contains(&needle)
                    || d.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
