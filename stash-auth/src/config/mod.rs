mod secrets;

pub use secrets::{EnvSource, MapSource, SecretResolver, SecretSource, SecretsFile};

use secrecy::{ExposeSecret, SecretString};

pub const CLIENT_ID_KEY: &str = "GOOGLE_OAUTH_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "GOOGLE_OAUTH_CLIENT_SECRET";
pub const REDIRECT_URI_KEY: &str = "STREAMLIT_REDIRECT_URI";

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8501/";

/// Google OAuth client credentials, resolved once at startup.
#[derive(Debug)]
pub struct OAuthCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub redirect_uri: String,
}

impl OAuthCredentials {
    pub fn resolve(resolver: &SecretResolver) -> Self {
        let credentials = Self {
            client_id: resolver.get(CLIENT_ID_KEY),
            client_secret: resolver.get(CLIENT_SECRET_KEY).map(SecretString::from),
            redirect_uri: resolver
                .get(REDIRECT_URI_KEY)
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
        };

        tracing::info!(
            client_id_present = credentials.client_id.is_some(),
            client_secret_present = credentials.client_secret.is_some(),
            redirect_uri = %credentials.redirect_uri,
            "OAuth credentials resolved"
        );

        credentials
    }

    /// Authentication is considered configured as soon as a client id is
    /// present, even if the secret is missing.
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    /// Client id and secret, when both are present.
    pub fn client_pair(&self) -> Option<(&str, &SecretString)> {
        Some((self.client_id.as_deref()?, self.client_secret.as_ref()?))
    }
}

impl Clone for OAuthCredentials {
    fn clone(&self) -> Self {
        Self {
            client_id: self.client_id.clone(),
            client_secret: self
                .client_secret
                .as_ref()
                .map(|s| SecretString::from(s.expose_secret().to_string())),
            redirect_uri: self.redirect_uri.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_client_id_is_not_configured() {
        let resolver = SecretResolver::new().with_source(
            MapSource::new()
                .with(CLIENT_SECRET_KEY, "secret")
                .with(REDIRECT_URI_KEY, "https://dash.example.com/"),
        );

        let credentials = OAuthCredentials::resolve(&resolver);

        assert!(!credentials.is_configured());
        assert!(credentials.client_pair().is_none());
    }

    #[test]
    fn test_client_id_alone_is_configured() {
        let resolver =
            SecretResolver::new().with_source(MapSource::new().with(CLIENT_ID_KEY, "client"));

        let credentials = OAuthCredentials::resolve(&resolver);

        assert!(credentials.is_configured());
        assert!(credentials.client_pair().is_none());
    }

    #[test]
    fn test_redirect_uri_defaults_to_localhost() {
        let credentials = OAuthCredentials::resolve(&SecretResolver::new());
        assert_eq!(credentials.redirect_uri, DEFAULT_REDIRECT_URI);
    }
}
