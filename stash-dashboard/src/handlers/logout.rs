use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;

use crate::AppState;

/// Forget the visitor and start over from an unauthenticated page.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session_id) = super::session_id(jar, state.secure_cookies);

    let mut session = state.session_store.load(&session_id);
    state.gate.logout(&mut session);
    state.session_store.remove(&session_id);

    (jar, Redirect::to("/"))
}
