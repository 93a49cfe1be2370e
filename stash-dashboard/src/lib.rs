pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod pages;
pub mod services;

pub use crate::config::Configuration;
pub use error::ServerError;

use axum::{
    routing::{get, post},
    Router,
};
use services::SessionStore;
use stash_auth::{Gate, GoogleIdentityProvider, OAuthCredentials, SecretResolver};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    pub session_store: Arc<SessionStore>,
    pub secure_cookies: bool,
}

impl AppState {
    /// Wire up the gate and session store, refusing to start without OAuth
    /// credentials when `auth.require_auth` is set.
    pub fn new(
        gate: Gate,
        session_store: SessionStore,
        configuration: &Configuration,
    ) -> Result<Self, ServerError> {
        if !gate.is_configured() {
            if configuration.auth.require_auth {
                return Err(ServerError::Configuration(
                    "require_auth is set but GOOGLE_OAUTH_CLIENT_ID is missing".to_string(),
                ));
            }
            tracing::warn!("OAuth is not configured, serving the dashboard without authentication");
        }

        Ok(Self {
            gate: Arc::new(gate),
            session_store: Arc::new(session_store),
            secure_cookies: configuration.server.secure_cookies,
        })
    }

    /// Resolve OAuth secrets and talk to Google for real.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ServerError> {
        let resolver = SecretResolver::standard(&configuration.auth.secrets_file);
        let credentials = OAuthCredentials::resolve(&resolver);
        let provider = Arc::new(GoogleIdentityProvider::new(credentials.clone()));

        Self::new(
            Gate::new(credentials, provider),
            SessionStore::new(configuration.server.session_ttl_seconds),
            configuration,
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::render_page))
        .route("/logout", post(handlers::logout))
        .route("/health", get(handlers::health_check))
        .route("/_stcore/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
