//! Tenant repository

use super::bounded;
use crate::domain::{StringUuid, Tenant};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Tenant>>;
    /// All tenants, ordered by name.
    async fn list_by_name(&self) -> Result<Vec<Tenant>>;
}

pub struct TenantRepositoryImpl {
    pool: MySqlPool,
    timeout: Duration,
}

impl TenantRepositoryImpl {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl TenantRepository for TenantRepositoryImpl {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Tenant>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Tenant>(
                r#"
                SELECT id, name, subdomain, logo_url, subscription_plan, created_at, updated_at
                FROM tenants
                WHERE id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list_by_name(&self) -> Result<Vec<Tenant>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Tenant>(
                r#"
                SELECT id, name, subdomain, logo_url, subscription_plan, created_at, updated_at
                FROM tenants
                ORDER BY name
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }
}
