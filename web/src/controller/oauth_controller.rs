//! Controller for the Google OAuth linking flow.
//!
//! Both endpoints are reached through browser redirects, so failures are answered with
//! plain text rather than JSON.

use crate::error::PlainTextError;
use crate::AppState;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use domain::provider_link;
use serde::Deserialize;

/// Query parameters for OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: String,
}

/// 302 to `location`. Browsers follow it with a GET.
fn found(location: &str) -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())])
}

/// GET /auth/google
///
/// Redirects the browser to Google's consent screen.
#[utoipa::path(
    get,
    path = "/auth/google",
    responses(
        (status = 302, description = "Redirect to Google OAuth consent"),
        (status = 500, description = "Server error (OAuth not configured)"),
    )
)]
pub async fn authorize(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, PlainTextError> {
    let url = provider_link::google_authorize_url(&app_state.config)?;
    Ok(found(&url))
}

/// GET /auth/google/callback
///
/// Exchanges the authorization code, links the Google account to the application user
/// with the same email and redirects back to the frontend.
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    params(
        ("code" = String, Query, description = "Authorization code from Google"),
    ),
    responses(
        (status = 302, description = "Redirect to the frontend on success"),
        (status = 400, description = "Missing authorization code"),
        (status = 401, description = "Google account matches no user", body = String),
        (status = 500, description = "Token exchange, profile fetch or token storage failed", body = String),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> Result<impl IntoResponse, PlainTextError> {
    let redirect_url = provider_link::exchange_and_link(
        app_state.db_conn_ref(),
        &app_state.config,
        &params.code,
    )
    .await?;

    Ok(found(&redirect_url))
}
