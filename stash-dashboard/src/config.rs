use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,

    #[serde(default)]
    pub auth: AuthConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,

    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfiguration {
    #[serde(default = "default_secrets_file")]
    pub secrets_file: String,

    /// Refuse to start when no OAuth client id can be resolved
    #[serde(default)]
    pub require_auth: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_session_ttl() -> u64 {
    86_400
}

fn default_secrets_file() -> String {
    "secrets.toml".to_string()
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_seconds: default_session_ttl(),
            secure_cookies: false,
        }
    }
}

impl Default for AuthConfiguration {
    fn default() -> Self {
        Self {
            secrets_file: default_secrets_file(),
            require_auth: false,
        }
    }
}

impl Configuration {
    /// `config.toml` if present, then `DASHBOARD__SECTION__KEY` environment
    /// variables. Plain `PORT` and `REQUIRE_AUTH` win over both.
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(config::File::with_name("config"));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix("DASHBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("auth.require_auth", std::env::var("REQUIRE_AUTH").ok())?;

        builder.build()?.try_deserialize()
    }
}
