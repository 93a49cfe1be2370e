mod logout;
mod page;

pub use logout::logout;
pub use page::render_page;

use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::models::HealthResponse;

/// Visitor session cookie name.
pub const SESSION_COOKIE: &str = "stash_session";

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Session id from the cookie, issuing a new one when it is missing or
/// not a UUID.
fn session_id(jar: CookieJar, secure: bool) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| Uuid::parse_str(v).is_ok())
    {
        return (jar, id);
    }

    issue_session_id(jar, secure)
}

/// Fresh session id, replacing any session cookie already in the jar.
fn issue_session_id(jar: CookieJar, secure: bool) -> (CookieJar, String) {
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax);

    (jar.add(cookie), id)
}
