//! Capability catalog and tenant permission evaluation

pub mod evaluator;
pub mod navigation;
pub mod registry;

pub use evaluator::{evaluate, is_granted, quota_limit, Decision, TenantPermissionSet};
pub use navigation::{visible_items, NavItem, NAV_ITEMS};
pub use registry::{keys, PermissionRegistry, DEFAULT_DEFINITIONS};
