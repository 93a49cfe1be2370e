use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use stash_auth::config::{MapSource, CLIENT_ID_KEY, CLIENT_SECRET_KEY, REDIRECT_URI_KEY};
use stash_auth::{
    AccessToken, AuthError, Gate, GateOutcome, IdentityProvider, OAuthCredentials,
    SecretResolver, SessionState, UserInfo,
};

/// Identity provider with canned answers that counts network round trips
struct MockProvider {
    user: Result<UserInfo, &'static str>,
    exchanges: AtomicUsize,
    profile_fetches: AtomicUsize,
    last_code: std::sync::Mutex<Option<String>>,
}

impl MockProvider {
    fn returning(email: &str, name: &str) -> Arc<Self> {
        Arc::new(Self {
            user: Ok(UserInfo {
                email: email.to_string(),
                name: Some(name.to_string()),
            }),
            exchanges: AtomicUsize::new(0),
            profile_fetches: AtomicUsize::new(0),
            last_code: std::sync::Mutex::new(None),
        })
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            user: Err(message),
            exchanges: AtomicUsize::new(0),
            profile_fetches: AtomicUsize::new(0),
            last_code: std::sync::Mutex::new(None),
        })
    }

    fn network_calls(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst) + self.profile_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        *self.last_code.lock().unwrap() = Some(code.to_string());
        match &self.user {
            Ok(_) => Ok(AccessToken::new("T")),
            Err(message) => Err(AuthError::TokenExchange(message.to_string())),
        }
    }

    async fn fetch_user_info(&self, token: &AccessToken) -> Result<UserInfo, AuthError> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        assert_eq!(token.secret(), "T");
        self.user
            .clone()
            .map_err(|message| AuthError::TokenExchange(message.to_string()))
    }
}

fn configured_credentials() -> OAuthCredentials {
    let resolver = SecretResolver::new().with_source(
        MapSource::new()
            .with(CLIENT_ID_KEY, "client-123.apps.googleusercontent.com")
            .with(CLIENT_SECRET_KEY, "shh")
            .with(REDIRECT_URI_KEY, "https://stash.peerplay.io/"),
    );
    OAuthCredentials::resolve(&resolver)
}

fn gate_with(provider: Arc<MockProvider>) -> Gate {
    Gate::new(configured_credentials(), provider)
}

#[tokio::test]
async fn test_allowed_login_marks_session_and_restarts() {
    let provider = MockProvider::returning("alice@peerplay.com", "Alice");
    let gate = gate_with(provider.clone());
    let mut session = SessionState::new();

    let outcome = gate
        .authenticate(&mut session, Some("ABC123"))
        .await
        .unwrap();

    assert_eq!(outcome, GateOutcome::Restart);
    assert!(session.is_authenticated());
    assert_eq!(session.user_email(), Some("alice@peerplay.com"));
    assert_eq!(session.user_name(), Some("Alice"));
    assert_eq!(provider.exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(provider.profile_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(provider.last_code.lock().unwrap().as_deref(), Some("ABC123"));
}

#[tokio::test]
async fn test_authenticated_session_skips_network() {
    let provider = MockProvider::returning("alice@peerplay.com", "Alice");
    let gate = gate_with(provider.clone());
    let mut session = SessionState::new();

    gate.authenticate(&mut session, Some("ABC123"))
        .await
        .unwrap();
    assert_eq!(provider.network_calls(), 2);

    // The restarted render, and any later ones, hit the fast path
    for code in [None, Some("ABC123"), Some("OTHER")] {
        let outcome = gate.authenticate(&mut session, code).await.unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Authenticated("alice@peerplay.com".to_string())
        );
    }
    assert_eq!(provider.network_calls(), 2);
}

#[tokio::test]
async fn test_outside_domain_is_denied_and_not_cached() {
    let provider = MockProvider::returning("bob@gmail.com", "Bob");
    let gate = gate_with(provider.clone());
    let mut session = SessionState::new();

    let outcome = gate
        .authenticate(&mut session, Some("ABC123"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        GateOutcome::Denied {
            email: "bob@gmail.com".to_string()
        }
    );
    assert_eq!(session, SessionState::default());
}

#[tokio::test]
async fn test_denied_visitor_can_retry_with_another_account() {
    let gate = gate_with(MockProvider::returning("bob@gmail.com", "Bob"));
    let mut session = SessionState::new();
    gate.authenticate(&mut session, Some("first")).await.unwrap();

    let gate = gate_with(MockProvider::returning("bob@peerplay.io", "Bob"));
    let outcome = gate.authenticate(&mut session, Some("second")).await.unwrap();

    assert_eq!(outcome, GateOutcome::Restart);
    assert_eq!(session.user_email(), Some("bob@peerplay.io"));
}

#[tokio::test]
async fn test_exchange_failure_is_reported_without_retry() {
    let provider = MockProvider::failing("invalid_grant");
    let gate = gate_with(provider.clone());
    let mut session = SessionState::new();

    let err = gate
        .authenticate(&mut session, Some("ABC123"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::TokenExchange(_)));
    assert!(err.to_string().contains("invalid_grant"));
    assert_eq!(provider.exchanges.load(Ordering::SeqCst), 1);
    assert_eq!(provider.profile_fetches.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_no_code_produces_sign_in_link() {
    let provider = MockProvider::returning("alice@peerplay.com", "Alice");
    let gate = gate_with(provider.clone());
    let mut session = SessionState::new();

    let outcome = gate.authenticate(&mut session, None).await.unwrap();

    let GateOutcome::Unauthenticated(Some(prompt)) = outcome else {
        panic!("expected a sign-in prompt, got {outcome:?}");
    };
    let url = url::Url::parse(&prompt.url).unwrap();
    let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "client-123.apps.googleusercontent.com");
    assert_eq!(params["redirect_uri"], "https://stash.peerplay.io/");
    assert_eq!(provider.network_calls(), 0);
}

#[tokio::test]
async fn test_missing_secret_yields_no_prompt() {
    let resolver = SecretResolver::new()
        .with_source(MapSource::new().with(CLIENT_ID_KEY, "client-123"));
    let gate = Gate::new(
        OAuthCredentials::resolve(&resolver),
        MockProvider::returning("alice@peerplay.com", "Alice"),
    );
    let mut session = SessionState::new();

    assert!(gate.is_configured());
    assert!(gate.build_authorization_url().is_none());

    let outcome = gate.authenticate(&mut session, None).await.unwrap();
    assert_eq!(outcome, GateOutcome::Unauthenticated(None));
}

#[test]
fn test_unconfigured_without_client_id() {
    let resolver =
        SecretResolver::new().with_source(MapSource::new().with(CLIENT_SECRET_KEY, "shh"));
    let provider = MockProvider::returning("alice@peerplay.com", "Alice");
    let gate = Gate::new(OAuthCredentials::resolve(&resolver), provider.clone());

    assert!(!gate.is_configured());
    assert_eq!(provider.network_calls(), 0);
}
