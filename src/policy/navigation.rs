//! Dashboard navigation gated by capability keys

use super::evaluator::{is_granted, TenantPermissionSet};
use super::registry::keys;
use crate::domain::Profile;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    /// Capability required to show the item
    pub permission: &'static str,
}

pub static NAV_ITEMS: [NavItem; 11] = [
    NavItem {
        id: "dashboard",
        label: "Dashboard",
        permission: keys::CAN_LOGIN,
    },
    NavItem {
        id: "jobs",
        label: "Jobs",
        permission: keys::CAN_POST_JOB,
    },
    NavItem {
        id: "applications",
        label: "Applications",
        permission: keys::CAN_POST_JOB,
    },
    NavItem {
        id: "interviews",
        label: "Interviews",
        permission: keys::CAN_USE_AI_VIDEO,
    },
    NavItem {
        id: "assessments",
        label: "Assessments",
        permission: keys::CAN_SEND_TESTS,
    },
    NavItem {
        id: "users",
        label: "Users",
        permission: keys::CAN_MANAGE_USERS,
    },
    NavItem {
        id: "permissions",
        label: "Permissions",
        permission: keys::CAN_EDIT_PERMISSIONS,
    },
    NavItem {
        id: "tenant",
        label: "Tenant Settings",
        permission: keys::CAN_MANAGE_TENANT,
    },
    NavItem {
        id: "reports",
        label: "Reports",
        permission: keys::CAN_VIEW_AUDIT_LOGS,
    },
    NavItem {
        id: "system-health",
        label: "System Health",
        permission: keys::CAN_VIEW_SYSTEM_HEALTH,
    },
    NavItem {
        id: "settings",
        label: "Settings",
        permission: keys::CAN_LOGIN,
    },
];

/// Items `profile` may see, in menu order.
pub fn visible_items(
    profile: &Profile,
    rows: &TenantPermissionSet,
    now: DateTime<Utc>,
) -> Vec<&'static NavItem> {
    NAV_ITEMS
        .iter()
        .filter(|item| is_granted(profile, item.permission, rows, now))
        .collect()
}
