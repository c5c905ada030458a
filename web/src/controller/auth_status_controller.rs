use crate::controller::CheckAuthResponse;
use crate::error::Result;
use crate::extractors::authenticated_user::BearerToken;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{AuthErrorKind, DomainErrorKind};
use domain::{identity, provider_link};
use log::*;

/// GET whether the caller has linked a Google account
///
/// A missing or rejected bearer token reports `false` instead of 401.
#[utoipa::path(
    get,
    path = "/api/check-auth",
    responses(
        (status = 200, description = "Link status of the caller", body = CheckAuthResponse),
        (status = 502, description = "Identity service unreachable", body = crate::error::ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_auth(
    BearerToken(token): BearerToken,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse> {
    let Some(token) = token else {
        return Ok(Json(CheckAuthResponse {
            authenticated: false,
        }));
    };

    let user_id = match identity::resolve_caller(&app_state.config, &token).await {
        Ok(user_id) => user_id,
        Err(e) if e.error_kind == DomainErrorKind::Auth(AuthErrorKind::Unauthenticated) => {
            return Ok(Json(CheckAuthResponse {
                authenticated: false,
            }));
        }
        Err(e) => return Err(e.into()),
    };

    let authenticated = provider_link::is_linked(app_state.db_conn_ref(), user_id).await?;
    debug!("User {user_id} linked to Google: {authenticated}");

    Ok(Json(CheckAuthResponse { authenticated }))
}
