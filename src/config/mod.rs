//! Configuration management for Hireboard Core

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Hosted auth service configuration
    pub auth: AuthServiceConfig,
    /// Audit trail configuration
    pub audit: AuditConfig,
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound for a single store call before it is reported unavailable
    pub timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Base URL of the hosted auth service (e.g., https://project.example.co)
    pub url: String,
    /// Public anon key sent as the `apikey` header
    pub anon_key: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Pending audit entries held before new ones are dropped with a warning
    pub channel_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            metrics_enabled: false,
            service_name: "hireboard-core".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
                timeout_ms: env::var("STORE_TIMEOUT_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .context("Invalid STORE_TIMEOUT_MS")?,
            },
            auth: AuthServiceConfig {
                url: env::var("AUTH_URL")
                    .context("AUTH_URL is required")?
                    .trim_end_matches('/')
                    .to_string(),
                anon_key: env::var("AUTH_ANON_KEY").context("AUTH_ANON_KEY is required")?,
                timeout_ms: env::var("AUTH_TIMEOUT_MS")
                    .unwrap_or_else(|_| "10000".to_string())
                    .parse()
                    .context("Invalid AUTH_TIMEOUT_MS")?,
            },
            audit: AuditConfig {
                channel_capacity: env::var("AUDIT_CHANNEL_CAPACITY")
                    .unwrap_or_else(|_| "256".to_string())
                    .parse()
                    .context("Invalid AUDIT_CHANNEL_CAPACITY")?,
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "hireboard-core".to_string()),
            },
        })
    }
}
