//! GoTrue-compatible session provider
//!
//! Keeps the current session in memory, refreshes it when the access token
//! has expired, and broadcasts sign-in/sign-out transitions to subscribers.

use super::types::*;
use crate::config::AuthServiceConfig;
use crate::domain::Identity;
use crate::error::{AppError, Result};
use crate::session::{IdentityEvent, SessionProvider};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

const EVENT_BUFFER: usize = 16;

#[derive(Clone)]
pub struct GoTrueSessionProvider {
    config: AuthServiceConfig,
    http_client: Client,
    session: Arc<RwLock<Option<StoredSession>>>,
    events: broadcast::Sender<IdentityEvent>,
}

#[derive(Debug, Clone)]
struct StoredSession {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: DateTime<Utc>,
    identity: Identity,
}

impl StoredSession {
    fn from_token(token: TokenResponse) -> Self {
        Self {
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            identity: token.user.into(),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now() + Duration::seconds(10)
    }
}

impl GoTrueSessionProvider {
    pub fn new(config: AuthServiceConfig) -> Result<Self> {
        url::Url::parse(&config.url)
            .map_err(|e| AppError::Validation(format!("Invalid auth service URL: {}", e)))?;

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Ok(Self {
            config,
            http_client,
            session: Arc::new(RwLock::new(None)),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn token_grant<B: serde::Serialize + ?Sized>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<TokenResponse> {
        let response = self
            .http_client
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.config.anon_key)
            .json(body)
            .send()
            .await?;

        let response = check_status(response).await?;
        response.json::<TokenResponse>().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to parse token response: {}", e))
        })
    }

    async fn store(&self, session: Option<StoredSession>) {
        let mut guard = self.session.write().await;
        *guard = session;
    }

    fn emit(&self, event: IdentityEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredSession> {
        let token = self
            .token_grant("refresh_token", &RefreshGrantRequest { refresh_token })
            .await?;
        Ok(StoredSession::from_token(token))
    }
}

/// Map non-success responses onto the crate error taxonomy.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: AuthErrorBody = response.json().await.unwrap_or_default();
    let message = body.describe();
    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Unauthenticated(message)
        }
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::TOO_MANY_REQUESTS => {
            AppError::StoreUnavailable(format!("auth service rate limited: {}", message))
        }
        s if s.is_server_error() => {
            AppError::StoreUnavailable(format!("auth service returned {}: {}", s, message))
        }
        s => AppError::Internal(anyhow::anyhow!("auth service returned {}: {}", s, message)),
    })
}

#[async_trait]
impl SessionProvider for GoTrueSessionProvider {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        let cached = self.session.read().await.clone();
        let Some(session) = cached else {
            return Ok(None);
        };

        if !session.is_expired() {
            return Ok(Some(session.identity));
        }

        let Some(refresh_token) = session.refresh_token.as_deref() else {
            self.store(None).await;
            self.emit(IdentityEvent::SignedOut);
            return Ok(None);
        };

        match self.refresh(refresh_token).await {
            Ok(renewed) => {
                debug!(user_id = %renewed.identity.id, "session refreshed");
                let identity = renewed.identity.clone();
                self.store(Some(renewed)).await;
                Ok(Some(identity))
            }
            Err(AppError::Unauthenticated(reason)) => {
                warn!(%reason, "refresh token rejected, clearing session");
                self.store(None).await;
                self.emit(IdentityEvent::SignedOut);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let token = self
            .token_grant("password", &PasswordGrantRequest { email, password })
            .await?;
        let session = StoredSession::from_token(token);
        let identity = session.identity.clone();

        self.store(Some(session)).await;
        self.emit(IdentityEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn end_session(&self) -> Result<()> {
        let Some(session) = self.session.read().await.clone() else {
            return Ok(());
        };

        let response = self
            .http_client
            .post(self.endpoint("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        // An already revoked token still ends the local session
        match check_status(response).await {
            Ok(_) | Err(AppError::Unauthenticated(_)) => {}
            Err(e) => return Err(e),
        }

        self.store(None).await;
        self.emit(IdentityEvent::SignedOut);
        Ok(())
    }
}
