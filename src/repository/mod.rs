//! Data access layer (Repository pattern)

pub mod audit;
pub mod permission;
pub mod profile;
pub mod tenant;

pub use audit::{AuditRepository, AuditRepositoryImpl};
pub use permission::{PermissionRepository, PermissionRepositoryImpl};
pub use profile::{ProfileRepository, ProfileRepositoryImpl};
pub use tenant::{TenantRepository, TenantRepositoryImpl};

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

/// Run a store call, reporting `StoreUnavailable` if it outlives `timeout`.
///
/// Dropping the returned future cancels the call.
pub(crate) async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    Ok(tokio::time::timeout(timeout, call).await??)
}
