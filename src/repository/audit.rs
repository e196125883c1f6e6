//! Audit log repository

use super::bounded;
use crate::domain::AuditEntry;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::time::Duration;

/// Append-only sink for audit entries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<()>;
}

pub struct AuditRepositoryImpl {
    pool: MySqlPool,
    timeout: Duration,
}

impl AuditRepositoryImpl {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl AuditRepository for AuditRepositoryImpl {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let details =
            serde_json::to_string(&entry.details).map_err(|e| AppError::Internal(e.into()))?;

        bounded(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO audit_logs
                    (tenant_id, user_id, action, resource_type, resource_id, details,
                     impersonated_from, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, NOW(6))
                "#,
            )
            .bind(entry.tenant_id)
            .bind(entry.user_id)
            .bind(entry.action.as_str())
            .bind(&entry.resource_type)
            .bind(&entry.resource_id)
            .bind(details)
            .bind(entry.impersonated_from)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}
