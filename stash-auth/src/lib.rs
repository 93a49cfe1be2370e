// Secret resolution and OAuth credentials
pub mod config;

// Email-domain allowlist
pub mod domain;

// Access gate and session value
mod error;
pub mod gate;
pub mod identity;
mod session;

pub use crate::config::{OAuthCredentials, SecretResolver};
pub use domain::{check_authorization, AllowedDomains};
pub use error::AuthError;
pub use gate::{Gate, GateOutcome, IdentityBanner, SignInPrompt};
pub use identity::{AccessToken, GoogleIdentityProvider, IdentityProvider, UserInfo};
pub use session::SessionState;
