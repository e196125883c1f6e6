//! Authenticated session: provider contract and explicit session state

pub mod provider;

pub use provider::{IdentityEvent, SessionProvider};

use crate::domain::{Identity, Profile, StringUuid};
use crate::error::{AppError, Result};
use serde::Serialize;

/// Session as seen by the console.
///
/// Transitions produce a new value instead of mutating shared state, so the
/// permission and impersonation logic can be driven without a UI harness.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    SignedOut,
    SignedIn {
        identity: Identity,
        /// None when the identity has no provisioned profile
        profile: Option<Profile>,
    },
}

impl SessionState {
    pub fn signed_in(identity: Identity, profile: Option<Profile>) -> Self {
        SessionState::SignedIn { identity, profile }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::SignedIn { .. })
    }

    pub fn identity(&self) -> Result<&Identity> {
        match self {
            SessionState::SignedIn { identity, .. } => Ok(identity),
            SessionState::SignedOut => Err(AppError::Unauthenticated(
                "no active session".to_string(),
            )),
        }
    }

    pub fn profile(&self) -> Result<&Profile> {
        match self {
            SessionState::SignedIn {
                profile: Some(profile),
                ..
            } => Ok(profile),
            SessionState::SignedIn { identity, .. } => Err(AppError::ProfileMissing {
                identity_id: identity.id.to_string(),
            }),
            SessionState::SignedOut => Err(AppError::Unauthenticated(
                "no active session".to_string(),
            )),
        }
    }

    /// Impersonated tenant if active, else the home tenant.
    pub fn effective_tenant_id(&self) -> Option<StringUuid> {
        self.profile().ok().map(Profile::effective_tenant_id)
    }

    /// Same identity with `profile` as its current profile. A signed-out
    /// session stays signed out.
    pub fn with_profile(&self, profile: Profile) -> Self {
        match self {
            SessionState::SignedIn { identity, .. } => SessionState::SignedIn {
                identity: identity.clone(),
                profile: Some(profile),
            },
            SessionState::SignedOut => SessionState::SignedOut,
        }
    }
}
