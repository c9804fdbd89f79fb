// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle: bootstrap on launch, login, register, and sign-out.
//!
//! The session moves Bootstrapping -> {Unauthenticated, Authenticated} once,
//! then between Unauthenticated and Authenticated through login, register,
//! and sign-out. The onboarding flag is orthogonal to authentication.
//!
//! All mutations go through a single `watch::Sender`, so subscribers always
//! see a consistent [`Session`] value. Failures never escape: bootstrap
//! degrades to Unauthenticated, login/register record `auth_error`, and
//! sign-out always clears.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use schediora_api::{ApiClient, Credentials};
use schediora_core::types::DEFAULT_USER_NAME;
use schediora_core::{OnboardingDraft, SchedioraError, TokenPair, TokenStore, UserProfile};
use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Process-wide session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub is_bootstrapping: bool,
    pub is_authenticated: bool,
    pub tokens: Option<TokenPair>,
    pub user_name: String,
    pub has_completed_onboarding: bool,
    pub onboarding_draft: OnboardingDraft,
    pub is_auth_loading: bool,
    pub auth_error: Option<String>,
    pub notifications_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            is_bootstrapping: true,
            is_authenticated: false,
            tokens: None,
            user_name: DEFAULT_USER_NAME.to_string(),
            has_completed_onboarding: false,
            onboarding_draft: OnboardingDraft::default(),
            is_auth_loading: false,
            auth_error: None,
            notifications_enabled: true,
        }
    }
}

impl Session {
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access_token.as_str())
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_bootstrapping {
            AuthStatus::Bootstrapping
        } else if self.is_authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    /// Which top-level screen a front end should show.
    pub fn route(&self) -> RootRoute {
        if self.is_bootstrapping {
            RootRoute::Bootstrapping
        } else if !self.has_completed_onboarding {
            RootRoute::Onboarding
        } else if !self.is_authenticated {
            RootRoute::Auth
        } else {
            RootRoute::Main
        }
    }

    fn sign_in(&mut self, tokens: TokenPair, profile: &UserProfile) {
        self.is_authenticated = true;
        self.tokens = Some(tokens);
        self.user_name = profile.display_name();
    }

    fn sign_out(&mut self) {
        self.is_authenticated = false;
        self.tokens = None;
        self.auth_error = None;
        self.user_name = DEFAULT_USER_NAME.to_string();
    }
}

/// Authentication status derived from a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Bootstrapping,
    Unauthenticated,
    Authenticated,
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStatus::Bootstrapping => write!(f, "bootstrapping"),
            AuthStatus::Unauthenticated => write!(f, "unauthenticated"),
            AuthStatus::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Top-level screen selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRoute {
    Bootstrapping,
    Onboarding,
    Auth,
    Main,
}

impl std::fmt::Display for RootRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootRoute::Bootstrapping => write!(f, "bootstrapping"),
            RootRoute::Onboarding => write!(f, "onboarding"),
            RootRoute::Auth => write!(f, "auth"),
            RootRoute::Main => write!(f, "main"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AuthMode {
    Login,
    Register,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Login => write!(f, "login"),
            AuthMode::Register => write!(f, "register"),
        }
    }
}

/// Owns the session and drives its transitions.
pub struct SessionController {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    bootstrapped: AtomicBool,
}

impl SessionController {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            api,
            store,
            state,
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token().map(str::to_string)
    }

    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status()
    }

    pub fn route(&self) -> RootRoute {
        self.state.borrow().route()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Resolves the persisted session. Runs once; later calls return immediately.
    pub async fn bootstrap(&self) {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            debug!("bootstrap already ran");
            return;
        }

        let (onboarding_done, restored) = match self.store.get_onboarding_done().await {
            Ok(done) => (done, self.restore().await),
            Err(e) => {
                warn!(error = %e, "failed to read onboarding flag");
                (false, Err(e))
            }
        };

        let restored = match restored {
            Ok(restored) => restored,
            Err(e) => {
                info!(error = %e, "stored session could not be restored, signing out");
                if let Err(e) = self.store.clear_tokens().await {
                    warn!(error = %e, "failed to clear stored tokens");
                }
                None
            }
        };

        self.state.send_modify(|session| {
            session.has_completed_onboarding = onboarding_done;
            match restored {
                Some((tokens, profile)) => session.sign_in(tokens, &profile),
                None => session.sign_out(),
            }
            session.is_bootstrapping = false;
        });
        info!(status = %self.status(), "bootstrap complete");
    }

    /// Validates stored tokens, refreshing once if the access token is rejected.
    async fn restore(&self) -> Result<Option<(TokenPair, UserProfile)>, SchedioraError> {
        let Some(tokens) = self.store.get_tokens().await?.into_pair() else {
            debug!("no stored tokens");
            return Ok(None);
        };

        match self.api.me(&tokens.access_token).await {
            Ok(profile) => return Ok(Some((tokens, profile))),
            Err(e) => debug!(error = %e, "stored access token rejected, refreshing"),
        }

        let rotated = self.api.refresh(&tokens.refresh_token).await?;
        self.store.save_tokens(&rotated).await?;
        let profile = self.api.me(&rotated.access_token).await?;
        Ok(Some((rotated, profile)))
    }

    /// Signs in with email and password.
    pub async fn login(&self, email: &str, password: &SecretString) -> AuthStatus {
        self.authenticate(AuthMode::Login, email, password).await
    }

    /// Creates an account and signs in.
    pub async fn register(&self, email: &str, password: &SecretString) -> AuthStatus {
        self.authenticate(AuthMode::Register, email, password).await
    }

    async fn authenticate(&self, mode: AuthMode, email: &str, password: &SecretString) -> AuthStatus {
        self.state.send_modify(|session| {
            session.is_auth_loading = true;
            session.auth_error = None;
        });

        let result = self.exchange_credentials(mode, email, password).await;

        let mut outcome = AuthStatus::Unauthenticated;
        self.state.send_modify(|session| {
            session.is_auth_loading = false;
            match result {
                Ok((tokens, profile)) => session.sign_in(tokens, &profile),
                Err(e) => {
                    warn!(%mode, error = %e, "authentication failed");
                    session.auth_error = Some(e.to_string());
                }
            }
            if session.is_authenticated {
                outcome = AuthStatus::Authenticated;
            }
        });
        outcome
    }

    async fn exchange_credentials(
        &self,
        mode: AuthMode,
        email: &str,
        password: &SecretString,
    ) -> Result<(TokenPair, UserProfile), SchedioraError> {
        let credentials = Credentials { email, password };
        let tokens = match mode {
            AuthMode::Login => self.api.login(&credentials).await?,
            AuthMode::Register => self.api.register(&credentials).await?,
        };
        self.store.save_tokens(&tokens).await?;
        let profile = self.api.me(&tokens.access_token).await?;
        info!(%mode, "authenticated");
        Ok((tokens, profile))
    }

    /// Signs out locally, revoking the refresh token on a best-effort basis.
    pub async fn sign_out(&self) {
        let refresh_token = self
            .state
            .borrow()
            .tokens
            .as_ref()
            .map(|t| t.refresh_token.clone());

        if let Some(refresh_token) = refresh_token {
            if let Err(e) = self.api.logout(&refresh_token).await {
                warn!(error = %e, "logout request failed");
            }
        }
        if let Err(e) = self.store.clear_tokens().await {
            warn!(error = %e, "failed to clear stored tokens");
        }

        self.state.send_modify(Session::sign_out);
        info!("signed out");
    }

    /// Marks onboarding complete and queues the flag write.
    ///
    /// The in-memory update is immediate. The returned handle resolves when
    /// the write finishes; write failures are logged only.
    pub fn complete_onboarding(&self, draft: OnboardingDraft) -> JoinHandle<()> {
        self.state.send_modify(|session| {
            session.has_completed_onboarding = true;
            session.onboarding_draft = draft;
        });

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.save_onboarding_done(true).await {
                warn!(error = %e, "failed to persist onboarding flag");
            }
        })
    }

    pub fn clear_auth_error(&self) {
        self.state.send_modify(|session| session.auth_error = None);
    }

    pub fn set_notifications(&self, enabled: bool) {
        self.state
            .send_modify(|session| session.notifications_enabled = enabled);
    }
}
