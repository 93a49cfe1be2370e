use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use stash_auth::AuthError;
use thiserror::Error;

use crate::pages;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            // Shown to the visitor in place of the page
            ServerError::Authentication(err) => {
                tracing::error!(error = %err, "Sign-in failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Html(pages::authentication_error(&err.to_string())),
                )
                    .into_response()
            }
            ServerError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": msg,
                })),
            )
                .into_response(),
        }
    }
}
