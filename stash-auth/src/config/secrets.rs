use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};

use crate::error::AuthError;

/// A place secrets can be read from.
///
/// Lookups never fail: anything that goes wrong while reading a source is
/// reported as "not found" so the resolver can move on to the next one.
pub trait SecretSource: Send + Sync {
    fn name(&self) -> &str;

    fn lookup(&self, key: &str) -> Option<String>;
}

/// Flat TOML file of per-deployment secrets, e.g.
///
/// ```toml
/// GOOGLE_OAUTH_CLIENT_ID = "1234.apps.googleusercontent.com"
/// GOOGLE_OAUTH_CLIENT_SECRET = "..."
/// ```
pub struct SecretsFile {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SecretsFile {
    /// Load secrets from `path`. A missing file yields an empty source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref().to_path_buf();

        let raw: HashMap<String, config::Value> = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false))
            .build()?
            .try_deserialize()?;

        // Keys are matched case-insensitively
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .into_string()
                    .ok()
                    .map(|value| (key.to_ascii_lowercase(), value))
            })
            .collect();

        Ok(Self { path, values })
    }

    /// Like [`SecretsFile::load`], but an unreadable file is logged and
    /// treated as empty.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Ignoring unreadable secrets file"
            );
            Self {
                path: path.to_path_buf(),
                values: HashMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SecretSource for SecretsFile {
    fn name(&self) -> &str {
        "secrets file"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(&key.to_ascii_lowercase()).cloned()
    }
}

/// Process environment variables with the same name as the secret.
pub struct EnvSource;

impl SecretSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory secrets.
#[derive(Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretSource for MapSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Ordered chain of secret sources. The first non-empty value wins.
#[derive(Default)]
pub struct SecretResolver {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Secrets file first, then the process environment.
    pub fn standard(secrets_file: impl AsRef<Path>) -> Self {
        Self::new()
            .with_source(SecretsFile::load_or_empty(secrets_file))
            .with_source(EnvSource)
    }

    pub fn with_source(mut self, source: impl SecretSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let value = source.lookup(key).filter(|v| !v.trim().is_empty())?;
            tracing::debug!(key, source = source.name(), "Resolved secret");
            Some(value)
        })
    }
}
