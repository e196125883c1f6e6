//! Common test utilities: in-memory repositories

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use hireboard_core::domain::{
    AuditEntry, Identity, PermissionFields, Profile, StringUuid, Tenant, TenantPermission,
};
use hireboard_core::error::{AppError, Result};
use hireboard_core::repository::{
    AuditRepository, PermissionRepository, ProfileRepository, TenantRepository,
};
use hireboard_core::session::SessionState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

// ============================================================================
// Permission repository
// ============================================================================

/// Mirrors the unique `(tenant_id, permission_key)` key: an insert that loses
/// the race to a concurrent insert fails with `Conflict`.
pub struct TestPermissionRepository {
    rows: RwLock<HashMap<(StringUuid, String), TenantPermission>>,
    unavailable: AtomicBool,
}

impl TestPermissionRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub async fn insert(&self, row: TenantPermission) {
        self.rows
            .write()
            .await
            .insert((row.tenant_id, row.permission_key.clone()), row);
    }

    pub async fn rows_for(&self, tenant_id: StringUuid, permission_key: &str) -> usize {
        self.rows
            .read()
            .await
            .keys()
            .filter(|(t, k)| *t == tenant_id && k == permission_key)
            .count()
    }

    pub async fn get(&self, tenant_id: StringUuid, permission_key: &str) -> Option<TenantPermission> {
        self.rows
            .read()
            .await
            .get(&(tenant_id, permission_key.to_string()))
            .cloned()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl Default for TestPermissionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionRepository for TestPermissionRepository {
    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<TenantPermission>> {
        self.check_available()?;
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| row.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        fields: PermissionFields,
    ) -> Result<TenantPermission> {
        self.check_available()?;
        if let Some(row) = self.update(tenant_id, permission_key, fields).await? {
            return Ok(row);
        }

        // Let a concurrent caller observe the same missing row
        tokio::task::yield_now().await;

        let mut rows = self.rows.write().await;
        let key = (tenant_id, permission_key.to_string());
        if rows.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "Duplicate entry '{}-{}'",
                tenant_id, permission_key
            )));
        }
        let row = TenantPermission::new(tenant_id, permission_key, fields, Utc::now());
        rows.insert(key, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        fields: PermissionFields,
    ) -> Result<Option<TenantPermission>> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        Ok(rows
            .get_mut(&(tenant_id, permission_key.to_string()))
            .map(|row| {
                row.enabled = fields.enabled;
                row.limit_count = fields.limit_count;
                row.updated_at = Utc::now();
                row.clone()
            }))
    }
}

// ============================================================================
// Profile repository
// ============================================================================

/// Applies `set_impersonation` like a transaction: with `fail_reread` set,
/// the write is staged, the re-read fails and nothing is kept.
pub struct TestProfileRepository {
    profiles: RwLock<Vec<Profile>>,
    unavailable: AtomicBool,
    fail_reread: AtomicBool,
}

impl TestProfileRepository {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(vec![]),
            unavailable: AtomicBool::new(false),
            fail_reread: AtomicBool::new(false),
        }
    }

    pub async fn add_profile(&self, profile: Profile) {
        self.profiles.write().await.push(profile);
    }

    pub async fn stored(&self, id: StringUuid) -> Option<Profile> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_fail_reread(&self, fail: bool) {
        self.fail_reread.store(fail, Ordering::SeqCst);
    }
}

impl Default for TestProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for TestProfileRepository {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Profile>> {
        Ok(self.stored(id).await)
    }

    async fn set_impersonation(
        &self,
        id: StringUuid,
        impersonate_tenant_id: Option<StringUuid>,
    ) -> Result<Profile> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("connection refused".to_string()));
        }
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;

        let staged = Profile {
            impersonate_tenant_id,
            updated_at: Utc::now(),
            ..profile.clone()
        };
        if self.fail_reread.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "timed out reading back profile".to_string(),
            ));
        }
        *profile = staged.clone();
        Ok(staged)
    }
}

// ============================================================================
// Tenant repository
// ============================================================================

pub struct TestTenantRepository {
    tenants: RwLock<Vec<Tenant>>,
}

impl TestTenantRepository {
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(vec![]),
        }
    }

    pub async fn add_tenant(&self, tenant: Tenant) {
        self.tenants.write().await.push(tenant);
    }
}

impl Default for TestTenantRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantRepository for TestTenantRepository {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Tenant>> {
        let tenants = self.tenants.read().await;
        Ok(tenants.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_name(&self) -> Result<Vec<Tenant>> {
        let mut tenants = self.tenants.read().await.clone();
        tenants.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tenants)
    }
}

// ============================================================================
// Audit repository
// ============================================================================

pub struct TestAuditRepository {
    entries: RwLock<Vec<AuditEntry>>,
    failing: AtomicBool,
}

impl TestAuditRepository {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(vec![]),
            failing: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        Self {
            entries: RwLock::new(vec![]),
            failing: AtomicBool::new(true),
        }
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }
}

impl Default for TestAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRepository for TestAuditRepository {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("audit store offline".to_string()));
        }
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn tenant(name: &str) -> Tenant {
    Tenant {
        name: name.to_string(),
        subdomain: name.to_lowercase(),
        ..Default::default()
    }
}

pub fn profile_in(tenant_id: StringUuid, is_super_admin: bool) -> Profile {
    Profile {
        tenant_id,
        email: format!("{}@example.com", StringUuid::new_v4()),
        is_super_admin,
        ..Default::default()
    }
}

pub fn session_for(profile: &Profile) -> SessionState {
    SessionState::signed_in(
        Identity {
            id: profile.id,
            email: Some(profile.email.clone()),
        },
        Some(profile.clone()),
    )
}
