use crate::controller::MeetLinkResponse;
use crate::error::Result;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::meeting;
use log::*;

/// POST create a Google Meet link on the caller's primary calendar
#[utoipa::path(
    post,
    path = "/api/create-google-meet",
    responses(
        (status = 200, description = "Meeting created", body = MeetLinkResponse),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ErrorBody),
        (status = 403, description = "Caller has not linked a Google account", body = crate::error::ErrorBody),
        (status = 500, description = "Google rejected the event", body = crate::error::ErrorBody),
        (status = 502, description = "Identity service unreachable", body = crate::error::ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_google_meet(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse> {
    debug!("POST create Google Meet for user {user_id}");

    let meet_link =
        meeting::create_meeting(app_state.db_conn_ref(), &app_state.config, user_id).await?;

    Ok(Json(MeetLinkResponse { meet_link }))
}
