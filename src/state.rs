//! Wiring of the production collaborators into the services

use crate::audit::{AuditDispatcher, AuditWorker};
use crate::config::Config;
use crate::gotrue::GoTrueSessionProvider;
use crate::repository::{
    AuditRepositoryImpl, PermissionRepositoryImpl, ProfileRepositoryImpl, TenantRepositoryImpl,
};
use crate::service::{AuthService, ImpersonationService, PermissionService, TenantService};
use anyhow::{Context, Result};
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tracing::info;

pub type Permissions = PermissionService<PermissionRepositoryImpl>;
pub type Impersonation = ImpersonationService<ProfileRepositoryImpl, TenantRepositoryImpl>;
pub type Auth = AuthService<GoTrueSessionProvider, ProfileRepositoryImpl>;
pub type Tenants = TenantService<TenantRepositoryImpl, ProfileRepositoryImpl>;

/// Services backed by MySQL and the hosted auth service
#[derive(Clone)]
pub struct CoreServices {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub permissions: Arc<Permissions>,
    pub impersonation: Arc<Impersonation>,
    pub auth: Arc<Auth>,
    pub tenants: Arc<Tenants>,
    pub session_provider: Arc<GoTrueSessionProvider>,
}

impl CoreServices {
    /// Connect the pool, start the audit worker and build every service.
    ///
    /// Must be called inside a Tokio runtime.
    pub async fn connect(config: Config) -> Result<Self> {
        let db_pool = MySqlPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .acquire_timeout(config.database.timeout())
            .connect(&config.database.url)
            .await
            .context("Failed to connect to database")?;

        info!("Connected to database");
        Self::with_pool(config, db_pool)
    }

    /// Build the services over an existing pool. Spawns the audit worker, so
    /// it must also run inside a Tokio runtime.
    pub fn with_pool(config: Config, db_pool: MySqlPool) -> Result<Self> {
        let timeout = config.database.timeout();

        let permission_repo = Arc::new(PermissionRepositoryImpl::new(db_pool.clone(), timeout));
        let profile_repo = Arc::new(ProfileRepositoryImpl::new(db_pool.clone(), timeout));
        let tenant_repo = Arc::new(TenantRepositoryImpl::new(db_pool.clone(), timeout));
        let audit_repo = Arc::new(AuditRepositoryImpl::new(db_pool.clone(), timeout));

        let (audit, receiver) = AuditDispatcher::channel(config.audit.channel_capacity);
        AuditWorker::new(receiver, audit_repo).spawn();

        let session_provider = Arc::new(
            GoTrueSessionProvider::new(config.auth.clone())
                .context("Failed to create auth service client")?,
        );

        Ok(Self {
            permissions: Arc::new(PermissionService::new(permission_repo)),
            impersonation: Arc::new(ImpersonationService::new(
                profile_repo.clone(),
                tenant_repo.clone(),
                audit.clone(),
            )),
            auth: Arc::new(AuthService::new(
                session_provider.clone(),
                profile_repo.clone(),
                audit,
            )),
            tenants: Arc::new(TenantService::new(tenant_repo, profile_repo)),
            session_provider,
            db_pool,
            config: Arc::new(config),
        })
    }
}
