use serde::Serialize;
use utoipa::ToSchema;

pub(crate) mod auth_status_controller;
pub(crate) mod health_check_controller;
pub(crate) mod meeting_controller;
pub(crate) mod oauth_controller;

/// Body of a successful `POST /api/create-google-meet`.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MeetLinkResponse {
    #[serde(rename = "meetLink")]
    pub meet_link: String,
}

/// Body of `GET /api/check-auth`.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CheckAuthResponse {
    pub authenticated: bool,
}
