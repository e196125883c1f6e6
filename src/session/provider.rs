//! Contract for the hosted auth/session service

use crate::domain::Identity;
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Identity transitions emitted by a session provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn(Identity),
    SignedOut,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Identity of the current session, if any.
    async fn current_identity(&self) -> Result<Option<Identity>>;

    /// Stream of sign-in/sign-out transitions.
    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent>;

    /// Password sign-in. Rejected credentials surface as `Unauthenticated`.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity>;

    /// End the current session. Succeeds when no session exists.
    async fn end_session(&self) -> Result<()>;
}
