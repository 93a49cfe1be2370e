//! Access gate in front of the dashboard.
//!
//! Hosts call the gate at the start of every page render, in this order:
//!
//! 1. [`Gate::is_configured`] — when `false` the gate is skipped entirely
//!    (local development without OAuth secrets).
//! 2. [`Gate::authenticate`] — anything other than
//!    [`GateOutcome::Authenticated`] means the host must stop rendering.
//! 3. [`Gate::identity_banner`] — who is signed in, for the logout control.

use std::sync::Arc;

use crate::config::OAuthCredentials;
use crate::domain::AllowedDomains;
use crate::error::AuthError;
use crate::identity::{self, IdentityProvider};
use crate::session::SessionState;

/// Result of one pass through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Visitor is signed in with an allowed email; render the page.
    Authenticated(String),

    /// Login just completed. The host should reload the current path
    /// without its query string so the one-time code leaves the URL.
    Restart,

    /// Visitor must sign in. `None` when no sign-in link can be built, in
    /// which case the host renders nothing further.
    Unauthenticated(Option<SignInPrompt>),

    /// Signed in with Google, but the email is outside the allowlist.
    Denied { email: String },
}

/// Link to the Google consent screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInPrompt {
    pub url: String,
}

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityBanner {
    pub display_name: String,
    pub email: String,
}

pub struct Gate {
    credentials: OAuthCredentials,
    allowed_domains: AllowedDomains,
    provider: Arc<dyn IdentityProvider>,
}

impl Gate {
    pub fn new(credentials: OAuthCredentials, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            credentials,
            allowed_domains: AllowedDomains::default(),
            provider,
        }
    }

    pub fn with_allowed_domains(mut self, allowed_domains: AllowedDomains) -> Self {
        self.allowed_domains = allowed_domains;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    pub fn build_authorization_url(&self) -> Option<String> {
        identity::authorization_url(&self.credentials)
    }

    pub fn allowed_domains(&self) -> &AllowedDomains {
        &self.allowed_domains
    }

    /// Decide whether the visitor may see the dashboard.
    ///
    /// An already authenticated session short-circuits without any network
    /// call. Otherwise a `code` is exchanged for a token and the profile is
    /// fetched; failures there are returned as errors and are not retried.
    pub async fn authenticate(
        &self,
        session: &mut SessionState,
        code: Option<&str>,
    ) -> Result<GateOutcome, AuthError> {
        if session.is_authenticated() {
            let email = session.user_email().unwrap_or_default().to_string();
            return Ok(GateOutcome::Authenticated(email));
        }

        let Some(code) = code.filter(|c| !c.is_empty()) else {
            let prompt = self
                .build_authorization_url()
                .map(|url| SignInPrompt { url });
            if prompt.is_none() {
                tracing::warn!("OAuth is partially configured, no sign-in link available");
            }
            return Ok(GateOutcome::Unauthenticated(prompt));
        };

        let token = self.provider.exchange_code(code).await?;
        let user_info = self.provider.fetch_user_info(&token).await?;

        if !self.allowed_domains.permits(&user_info.email) {
            tracing::warn!(email = %user_info.email, "Access denied for email outside allowed domains");
            return Ok(GateOutcome::Denied {
                email: user_info.email,
            });
        }

        tracing::info!(email = %user_info.email, "User signed in");
        session.login(user_info.email, user_info.name);

        Ok(GateOutcome::Restart)
    }

    pub fn identity_banner(&self, session: &SessionState) -> Option<IdentityBanner> {
        if !session.is_authenticated() {
            return None;
        }

        Some(IdentityBanner {
            display_name: session.user_name().unwrap_or("User").to_string(),
            email: session.user_email().unwrap_or_default().to_string(),
        })
    }

    pub fn logout(&self, session: &mut SessionState) {
        if let Some(email) = session.user_email() {
            tracing::info!(email = %email, "User signed out");
        }
        session.clear();
    }
}
