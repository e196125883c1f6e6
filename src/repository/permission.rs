//! Tenant permission repository

use super::bounded;
use crate::domain::{PermissionFields, StringUuid, TenantPermission};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool};
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<TenantPermission>>;

    /// Insert-or-update keyed on `(tenant_id, permission_key)`.
    ///
    /// A fresh row starts with `valid_from = now` and no end; an existing row
    /// only has `enabled`, `limit_count` and `updated_at` rewritten. May fail
    /// with `Conflict` when a concurrent insert wins the unique key.
    async fn upsert(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        fields: PermissionFields,
    ) -> Result<TenantPermission>;

    /// Plain update of an existing row; `None` when no row matches.
    async fn update(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        fields: PermissionFields,
    ) -> Result<Option<TenantPermission>>;
}

pub struct PermissionRepositoryImpl {
    pool: MySqlPool,
    timeout: Duration,
}

impl PermissionRepositoryImpl {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

async fn fetch_row<'e, E>(
    executor: E,
    tenant_id: StringUuid,
    permission_key: &str,
) -> std::result::Result<Option<TenantPermission>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, TenantPermission>(
        r#"
        SELECT id, tenant_id, permission_key, enabled, limit_count,
               valid_from, valid_until, created_at, updated_at
        FROM tenant_permissions
        WHERE tenant_id = ? AND permission_key = ?
        "#,
    )
    .bind(tenant_id)
    .bind(permission_key)
    .fetch_optional(executor)
    .await
}

#[async_trait]
impl PermissionRepository for PermissionRepositoryImpl {
    async fn list_by_tenant(&self, tenant_id: StringUuid) -> Result<Vec<TenantPermission>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, TenantPermission>(
                r#"
                SELECT id, tenant_id, permission_key, enabled, limit_count,
                       valid_from, valid_until, created_at, updated_at
                FROM tenant_permissions
                WHERE tenant_id = ?
                ORDER BY permission_key
                "#,
            )
            .bind(tenant_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn upsert(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        fields: PermissionFields,
    ) -> Result<TenantPermission> {
        // Write and re-read commit together; a timeout drops the transaction
        // and rolls the write back.
        let write = async {
            let mut tx = self.pool.begin().await?;
            sqlx::query(
                r#"
                INSERT INTO tenant_permissions
                    (id, tenant_id, permission_key, enabled, limit_count,
                     valid_from, valid_until, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, NOW(6), NULL, NOW(6), NOW(6))
                ON DUPLICATE KEY UPDATE
                    enabled = VALUES(enabled),
                    limit_count = VALUES(limit_count),
                    updated_at = NOW(6)
                "#,
            )
            .bind(StringUuid::new_v4())
            .bind(tenant_id)
            .bind(permission_key)
            .bind(fields.enabled)
            .bind(fields.limit_count)
            .execute(&mut *tx)
            .await?;

            let row = fetch_row(&mut *tx, tenant_id, permission_key).await?;
            if row.is_some() {
                tx.commit().await?;
            }
            Ok::<_, sqlx::Error>(row)
        };

        bounded(self.timeout, write).await?.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "permission {} vanished after upsert",
                permission_key
            ))
        })
    }

    async fn update(
        &self,
        tenant_id: StringUuid,
        permission_key: &str,
        fields: PermissionFields,
    ) -> Result<Option<TenantPermission>> {
        let write = async {
            let mut tx = self.pool.begin().await?;
            sqlx::query(
                r#"
                UPDATE tenant_permissions
                SET enabled = ?, limit_count = ?, updated_at = NOW(6)
                WHERE tenant_id = ? AND permission_key = ?
                "#,
            )
            .bind(fields.enabled)
            .bind(fields.limit_count)
            .bind(tenant_id)
            .bind(permission_key)
            .execute(&mut *tx)
            .await?;

            let row = fetch_row(&mut *tx, tenant_id, permission_key).await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        };

        bounded(self.timeout, write).await
    }
}
