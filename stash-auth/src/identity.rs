use async_trait::async_trait;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    HttpRequest, HttpResponse, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::OAuthCredentials;
use crate::error::AuthError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

pub const SCOPES: [&str; 3] = [
    "openid",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// Bearer token returned by the code exchange.
#[derive(Debug)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Subset of the Google userinfo response the gate cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// The two network round trips of a login.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a one-time authorization code for an access token
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError>;

    /// Fetch the profile of the token's owner
    async fn fetch_user_info(&self, token: &AccessToken) -> Result<UserInfo, AuthError>;
}

// Simple async HTTP client for OAuth2
async fn http_client(request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
    let client = reqwest::Client::new();
    let mut builder = client
        .request(request.method().clone(), request.uri().to_string())
        .body(request.body().clone());

    for (name, value) in request.headers() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    let response = builder.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    let mut http_response = HttpResponse::new(body);
    *http_response.status_mut() = status;
    *http_response.headers_mut() = headers;

    Ok(http_response)
}

/// Build the Google consent-screen URL for the configured client.
///
/// Returns `None` unless both client id and secret are present. No network
/// call is made.
pub fn authorization_url(credentials: &OAuthCredentials) -> Option<String> {
    let (client_id, client_secret) = credentials.client_pair()?;

    let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string()).ok()?;
    let redirect_url = match RedirectUrl::new(credentials.redirect_uri.clone()) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid redirect URI, cannot build sign-in link");
            return None;
        }
    };

    let client = BasicClient::new(ClientId::new(client_id.to_string()))
        .set_client_secret(ClientSecret::new(client_secret.expose_secret().to_string()))
        .set_auth_uri(auth_url)
        .set_redirect_uri(redirect_url);

    let mut request = client.authorize_url(CsrfToken::new_random);

    for scope in SCOPES {
        request = request.add_scope(Scope::new(scope.to_string()));
    }

    // The state is not kept: the redirect back is handled from `code` alone
    // and `state` is never checked.
    let (url, _state) = request
        .add_extra_param("access_type", "offline")
        .add_extra_param("prompt", "consent")
        .url();

    Some(url.to_string())
}

/// Google OAuth 2.0 identity provider.
pub struct GoogleIdentityProvider {
    credentials: OAuthCredentials,
    token_url: String,
    userinfo_url: String,
    http: reqwest::Client,
}

impl GoogleIdentityProvider {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_userinfo_url(mut self, url: impl Into<String>) -> Self {
        self.userinfo_url = url.into();
        self
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let (client_id, client_secret) = self.credentials.client_pair().ok_or_else(|| {
            AuthError::Configuration("OAuth client id or secret is not set".to_string())
        })?;

        let token_url = TokenUrl::new(self.token_url.clone())
            .map_err(|e| AuthError::Configuration(format!("Invalid token URL: {}", e)))?;

        let redirect_url = RedirectUrl::new(self.credentials.redirect_uri.clone())
            .map_err(|e| AuthError::Configuration(format!("Invalid redirect URI: {}", e)))?;

        let token_result = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.expose_secret().to_string()))
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url)
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        tracing::debug!("Exchanged authorization code for access token");

        Ok(AccessToken::new(token_result.access_token().secret().clone()))
    }

    async fn fetch_user_info(&self, token: &AccessToken) -> Result<UserInfo, AuthError> {
        let user_info = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(token.secret())
            .send()
            .await?
            .error_for_status()?
            .json::<UserInfo>()
            .await?;

        tracing::debug!(email = %user_info.email, "Fetched user info");

        Ok(user_info)
    }
}
