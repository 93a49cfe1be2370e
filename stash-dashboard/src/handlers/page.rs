use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use stash_auth::GateOutcome;
use tracing::Instrument;

use crate::{error::ServerError, models::PageParams, pages, AppState};

/// One render of the dashboard, gated by the access gate.
pub async fn render_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
    uri: Uri,
    jar: CookieJar,
) -> Result<Response, ServerError> {
    let params = PageParams::from_pairs(pairs);
    let (jar, session_id) = super::session_id(jar, state.secure_cookies);

    let span = tracing::info_span!("render_page", session_id = %session_id);

    async move {
        if !state.gate.is_configured() {
            return Ok::<_, ServerError>((jar, Html(pages::dashboard(None))).into_response());
        }

        let mut session = state.session_store.load(&session_id);
        let outcome = state
            .gate
            .authenticate(&mut session, params.code.as_deref())
            .await?;

        // Only a completed sign-in changes the session
        let (jar, response) = match outcome {
            GateOutcome::Authenticated(_) => {
                let banner = state.gate.identity_banner(&session);
                (jar, Html(pages::dashboard(banner.as_ref())).into_response())
            }
            GateOutcome::Restart => {
                // A signed-in session never keeps the id it had before sign-in
                let (jar, new_id) = super::issue_session_id(jar, state.secure_cookies);
                state.session_store.remove(&session_id);
                state.session_store.save(&new_id, session);

                // Reload from a clean URL so the one-time code is not reused
                tracing::debug!("Sign-in complete, redirecting to {}", uri.path());
                (jar, Redirect::to(uri.path()).into_response())
            }
            GateOutcome::Unauthenticated(Some(prompt)) => {
                (jar, Html(pages::sign_in(&prompt.url)).into_response())
            }
            GateOutcome::Unauthenticated(None) => (jar, Html(pages::blank()).into_response()),
            GateOutcome::Denied { email } => (
                jar,
                (StatusCode::FORBIDDEN, Html(pages::access_denied(&email))).into_response(),
            ),
        };

        Ok((jar, response).into_response())
    }
    .instrument(span)
    .await
}
