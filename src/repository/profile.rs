//! Profile repository

use super::bounded;
use crate::domain::{Profile, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::{MySql, MySqlPool};
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Profile>>;

    /// Write `impersonate_tenant_id` (None clears it) and return the stored profile.
    async fn set_impersonation(
        &self,
        id: StringUuid,
        impersonate_tenant_id: Option<StringUuid>,
    ) -> Result<Profile>;
}

pub struct ProfileRepositoryImpl {
    pool: MySqlPool,
    timeout: Duration,
}

impl ProfileRepositoryImpl {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

async fn fetch_profile<'e, E>(
    executor: E,
    id: StringUuid,
) -> std::result::Result<Option<Profile>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = MySql>,
{
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, tenant_id, email, full_name, avatar_url, phone, position,
               department, is_super_admin, impersonate_tenant_id, last_login,
               created_at, updated_at
        FROM profiles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

#[async_trait]
impl ProfileRepository for ProfileRepositoryImpl {
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Profile>> {
        bounded(self.timeout, fetch_profile(&self.pool, id)).await
    }

    async fn set_impersonation(
        &self,
        id: StringUuid,
        impersonate_tenant_id: Option<StringUuid>,
    ) -> Result<Profile> {
        // Last write wins: the row update is the serialization point. The
        // update only commits once the re-read succeeds, so a failed or
        // timed-out call leaves the field as it was.
        let write = async {
            let mut tx = self.pool.begin().await?;
            sqlx::query(
                r#"
                UPDATE profiles
                SET impersonate_tenant_id = ?, updated_at = NOW(6)
                WHERE id = ?
                "#,
            )
            .bind(impersonate_tenant_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

            let profile = fetch_profile(&mut *tx, id).await?;
            if profile.is_some() {
                tx.commit().await?;
            }
            Ok::<_, sqlx::Error>(profile)
        };

        bounded(self.timeout, write)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }
}
