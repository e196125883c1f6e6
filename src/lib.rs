//! Hireboard Core - tenant permission and impersonation backend
//!
//! Capability evaluation, the per-tenant permission store, super-admin
//! tenant impersonation and audited sign-in/sign-out for the Hireboard
//! recruiting console.

pub mod audit;
pub mod config;
pub mod domain;
pub mod error;
pub mod gotrue;
pub mod migration;
pub mod policy;
pub mod repository;
pub mod service;
pub mod session;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use session::SessionState;
pub use state::CoreServices;
