//! Sign-in/sign-out wrapper around the session provider

use crate::audit::AuditDispatcher;
use crate::domain::{AuditAction, AuditEntry, Identity, Profile};
use crate::error::{AppError, Result};
use crate::repository::ProfileRepository;
use crate::session::{IdentityEvent, SessionProvider, SessionState};
use crate::telemetry::metrics::record_auth_event;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a successful credential check
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    SignedIn { identity: Identity, profile: Profile },
    /// Credentials were valid but no profile is provisioned for the identity
    ProfileMissing { identity: Identity },
}

impl SignInOutcome {
    pub fn identity(&self) -> &Identity {
        match self {
            SignInOutcome::SignedIn { identity, .. } => identity,
            SignInOutcome::ProfileMissing { identity } => identity,
        }
    }

    pub fn into_session(self) -> SessionState {
        match self {
            SignInOutcome::SignedIn { identity, profile } => {
                SessionState::signed_in(identity, Some(profile))
            }
            SignInOutcome::ProfileMissing { identity } => SessionState::signed_in(identity, None),
        }
    }

    /// The profile, or `ProfileMissing` for an unprovisioned identity.
    pub fn into_profile(self) -> Result<Profile> {
        match self {
            SignInOutcome::SignedIn { profile, .. } => Ok(profile),
            SignInOutcome::ProfileMissing { identity } => Err(AppError::ProfileMissing {
                identity_id: identity.id.to_string(),
            }),
        }
    }
}

pub struct AuthService<S: SessionProvider, PR: ProfileRepository> {
    provider: Arc<S>,
    profile_repo: Arc<PR>,
    audit: AuditDispatcher,
}

impl<S: SessionProvider, PR: ProfileRepository> AuthService<S, PR> {
    pub fn new(provider: Arc<S>, profile_repo: Arc<PR>, audit: AuditDispatcher) -> Self {
        Self {
            provider,
            profile_repo,
            audit,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome> {
        let identity = match self.provider.authenticate(email, password).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                record_auth_event("login", false);
                return Err(e);
            }
        };

        // A session the caller never learns about must not stay open
        let profile = match self.profile_repo.find_by_id(identity.id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %identity.id, error = %e, "profile lookup failed after sign-in");
                if let Err(end_err) = self.provider.end_session().await {
                    warn!(error = %end_err, "failed to end the orphaned session");
                }
                record_auth_event("login", false);
                return Err(e);
            }
        };
        record_auth_event("login", true);

        let entry = match &profile {
            Some(profile) => AuditEntry::for_profile(profile, AuditAction::Login),
            None => {
                warn!(user_id = %identity.id, "signed in without a provisioned profile");
                AuditEntry::for_identity(&identity, AuditAction::Login)
            }
        };
        self.audit.record(entry.with_details(json!({ "email": email })));
        info!(user_id = %identity.id, "user signed in");

        Ok(match profile {
            Some(profile) => SignInOutcome::SignedIn { identity, profile },
            None => SignInOutcome::ProfileMissing { identity },
        })
    }

    /// End the session described by `state` and return the signed-out state.
    pub async fn sign_out(&self, state: &SessionState) -> Result<SessionState> {
        // Attribute the entry while the actor is still known
        let entry = match state {
            SessionState::SignedIn {
                profile: Some(profile),
                ..
            } => AuditEntry::for_profile(profile, AuditAction::Logout),
            SessionState::SignedIn { identity, .. } => {
                AuditEntry::for_identity(identity, AuditAction::Logout)
            }
            SessionState::SignedOut => AuditEntry::anonymous(AuditAction::Logout),
        };

        if let Err(e) = self.provider.end_session().await {
            warn!(error = %e, "sign-out failed");
            record_auth_event("logout", false);
            return Err(e);
        }

        record_auth_event("logout", true);
        self.audit.record(entry);
        if let Ok(identity) = state.identity() {
            info!(user_id = %identity.id, "user signed out");
        }

        Ok(SessionState::SignedOut)
    }

    /// Session for whatever identity the provider currently holds.
    pub async fn restore_session(&self) -> Result<SessionState> {
        match self.provider.current_identity().await? {
            Some(identity) => self.session_for(identity).await,
            None => Ok(SessionState::SignedOut),
        }
    }

    /// Next session state after a provider transition. A repeated sign-in
    /// for the identity already holding a profile keeps the current state.
    pub async fn apply_event(
        &self,
        state: &SessionState,
        event: IdentityEvent,
    ) -> Result<SessionState> {
        match event {
            IdentityEvent::SignedIn(identity) => {
                if let SessionState::SignedIn {
                    identity: current,
                    profile: Some(_),
                } = state
                {
                    if current.id == identity.id {
                        return Ok(state.clone());
                    }
                }
                self.session_for(identity).await
            }
            IdentityEvent::SignedOut => Ok(SessionState::SignedOut),
        }
    }

    async fn session_for(&self, identity: Identity) -> Result<SessionState> {
        let profile = self.profile_repo.find_by_id(identity.id).await?;
        Ok(SessionState::signed_in(identity, profile))
    }
}
