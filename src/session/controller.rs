use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::api::models::{LoginCredentials, RegisteredUser, Registration};
use crate::api::{AuthApi, ClientError};
use crate::db::models::{Session, SessionUser};
use crate::error::AppResult;
use crate::session::store::SessionStore;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Error,
}

/// Result of a login attempt. Login never fails with an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Logout always succeeds locally; `remote_acknowledged` reports whether the
/// API also confirmed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogoutOutcome {
    pub success: bool,
    pub remote_acknowledged: bool,
}

/// Read-only view of the controller for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSnapshot {
    pub phase: AuthPhase,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub user: Option<SessionUser>,
}

struct AuthState {
    phase: AuthPhase,
    session: Session,
    error: Option<String>,
    /// Bumped by every logout so a login that resolves afterwards is dropped.
    epoch: u64,
}

impl AuthState {
    fn resting_phase(&self) -> AuthPhase {
        if self.session.authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }

    fn fail(&mut self, message: &str) {
        self.phase = AuthPhase::Error;
        self.error = Some(message.to_string());
    }
}

/// Owns the session for the lifetime of the process and is the only writer
/// of the session store.
pub struct SessionController {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
    state: Mutex<AuthState>,
}

impl SessionController {
    /// Builds the controller from whatever the store holds right now. Leftover
    /// keys that do not form a valid session are cleared (forced logout).
    pub fn hydrate(api: Arc<dyn AuthApi>, store: SessionStore) -> AppResult<Self> {
        let mut session = store.load()?;
        let corrupted = !session.is_consistent()
            || (!session.authenticated && !store.keys()?.is_empty());
        if corrupted {
            tracing::warn!("Persisted session is corrupted, forcing logout");
            store.clear()?;
            session = Session::default();
        }

        let phase = if session.authenticated {
            tracing::info!(
                "Restored session for {}",
                session.user.as_ref().map(|u| u.username.as_str()).unwrap_or("?")
            );
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        };

        Ok(Self {
            api,
            store,
            state: Mutex::new(AuthState {
                phase,
                session,
                error: None,
                epoch: 0,
            }),
        })
    }

    pub async fn snapshot(&self) -> AuthSnapshot {
        let state = self.state.lock().await;
        AuthSnapshot {
            phase: state.phase,
            is_authenticated: state.session.authenticated,
            is_loading: state.phase == AuthPhase::Authenticating,
            error: state.error.clone(),
            user: state.session.user.clone(),
        }
    }

    pub async fn session(&self) -> Session {
        self.state.lock().await.session.clone()
    }

    pub async fn login(&self, credentials: LoginCredentials) -> LoginOutcome {
        let epoch = {
            let mut state = self.state.lock().await;
            if let Err(err) = validation::validate_credentials(&credentials) {
                let message = err.to_string();
                // A signed-in or signing-in session keeps its phase.
                if matches!(state.phase, AuthPhase::Unauthenticated | AuthPhase::Error) {
                    state.fail(&message);
                }
                return LoginOutcome::failure(message);
            }

            match state.phase {
                AuthPhase::Authenticating => {
                    return LoginOutcome::failure("A sign-in request is already in progress");
                }
                AuthPhase::Authenticated => {
                    return LoginOutcome::failure("You are already signed in");
                }
                AuthPhase::Unauthenticated | AuthPhase::Error => {}
            }

            state.phase = AuthPhase::Authenticating;
            state.error = None;
            state.epoch
        };

        let credentials = LoginCredentials {
            email: credentials.email.trim().to_string(),
            password: credentials.password,
        };
        let result = self.api.login(&credentials).await;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::info!("Discarding login result that finished after logout");
            return LoginOutcome::failure("Sign-in was cancelled");
        }

        let outcome = match result {
            Ok(response) => {
                let message = response
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Login failed".to_string());
                match response.into_session() {
                    Some(session) => match self.store.save(&session) {
                        Ok(()) => {
                            tracing::info!(
                                "Signed in as {}",
                                session.user.as_ref().map(|u| u.username.as_str()).unwrap_or("?")
                            );
                            state.session = session;
                            state.phase = AuthPhase::Authenticated;
                            state.error = None;
                            return LoginOutcome::success();
                        }
                        Err(e) => {
                            tracing::error!("Failed to persist session: {}", e);
                            "Could not save your session. Please try again.".to_string()
                        }
                    },
                    None => message,
                }
            }
            Err(err) => err.to_string(),
        };

        state.fail(&outcome);
        LoginOutcome::failure(outcome)
    }

    /// Best-effort remote logout; the local session is always cleared.
    pub async fn logout(&self) -> LogoutOutcome {
        let token = {
            let mut state = self.state.lock().await;
            state.phase = AuthPhase::Authenticating;
            state.error = None;
            state.epoch += 1;
            state.session.bearer().map(str::to_string)
        };

        let remote_acknowledged = match self.api.logout(token.as_deref()).await {
            Ok(response) => {
                if !response.success {
                    tracing::warn!(
                        "Remote logout not acknowledged: {}",
                        response.message.as_deref().unwrap_or("no message")
                    );
                }
                response.success
            }
            Err(err) => {
                tracing::warn!("Remote logout failed, clearing local session anyway: {}", err);
                false
            }
        };

        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear persisted session: {}", e);
        }

        let mut state = self.state.lock().await;
        state.session = Session::default();
        state.phase = AuthPhase::Unauthenticated;
        state.error = None;
        tracing::info!("Signed out");

        LogoutOutcome {
            success: true,
            remote_acknowledged,
        }
    }

    /// Creates an account. Does not sign in or touch the session.
    pub async fn register(&self, registration: Registration) -> Result<RegisteredUser, ClientError> {
        validation::validate_registration(&registration)?;

        let registration = Registration {
            username: registration.username.trim().to_string(),
            email: registration.email.trim().to_string(),
            password: registration.password,
        };
        let user = self.api.register(&registration).await?;
        tracing::info!("Registered account {}", user.username);
        Ok(user)
    }

    /// Returns from the error state to the last non-error state.
    pub async fn clear_error(&self) {
        let mut state = self.state.lock().await;
        if state.phase == AuthPhase::Error {
            state.phase = state.resting_phase();
        }
        state.error = None;
    }

    /// Persists and installs a session obtained outside the login form
    /// (the OAuth callback). A password login still in flight is superseded.
    pub async fn adopt(&self, session: Session) -> AppResult<()> {
        let mut state = self.state.lock().await;
        self.store.save(&session)?;
        state.epoch += 1;
        state.session = session;
        state.phase = AuthPhase::Authenticated;
        state.error = None;
        Ok(())
    }
}
