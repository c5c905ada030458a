//! Provisioning Google Meet links for linked users.
use crate::error::{AuthErrorKind, DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::{
    self,
    google_calendar::{
        ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, EventDateTime,
        EventRequest, GoogleCalendarClient, PRIMARY_CALENDAR,
    },
};
use crate::provider_link;
use crate::Id;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::*;
use meeting_auth::credentials::ProviderCredentials;
use sea_orm::ConnectionTrait;
use service::config::{Config, ProvisioningMode};

pub const MEETING_SUMMARY: &str = "Mentorship Session";
pub const MEETING_DURATION_MINUTES: i64 = 30;
pub const CONFERENCE_TYPE: &str = "hangoutsMeet";

/// A meeting to be created on the caller's primary calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRequest {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub conference_type: String,
    /// Unique per call, so repeated calls create distinct conferences.
    pub request_id: String,
}

impl MeetingRequest {
    /// A mentorship session starting at `now` and lasting thirty minutes.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            summary: MEETING_SUMMARY.to_string(),
            start: now,
            end: now + Duration::minutes(MEETING_DURATION_MINUTES),
            conference_type: CONFERENCE_TYPE.to_string(),
            request_id: format!(
                "meet-{}-{}",
                now.timestamp_millis(),
                Id::new_v4().simple()
            ),
        }
    }
}

impl From<&MeetingRequest> for EventRequest {
    fn from(request: &MeetingRequest) -> Self {
        EventRequest {
            summary: request.summary.clone(),
            start: EventDateTime {
                date_time: request.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            end: EventDateTime {
                date_time: request.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            conference_data: ConferenceData {
                create_request: CreateConferenceRequest {
                    request_id: request.request_id.clone(),
                    conference_solution_key: ConferenceSolutionKey {
                        kind: request.conference_type.clone(),
                    },
                },
            },
        }
    }
}

/// Create a Meet link for a user with a linked Google account.
///
/// A user without stored tokens gets `AuthErrorKind::ProviderNotLinked` and Google is
/// not called. In `ProvisioningMode::Placeholder` the configured placeholder link is
/// returned instead of calling Google.
pub async fn create_meeting(
    db: &impl ConnectionTrait,
    config: &Config,
    user_id: Id,
) -> Result<String, Error> {
    let tokens = provider_link::load_tokens(db, user_id)
        .await?
        .ok_or_else(|| {
            info!("User {user_id} has no Google tokens stored");
            Error::auth(AuthErrorKind::ProviderNotLinked)
        })?;

    if config.provisioning_mode == ProvisioningMode::Placeholder {
        info!("Returning placeholder Meet link for user {user_id}");
        return Ok(config.placeholder_meet_link().to_string());
    }

    let credentials = ProviderCredentials::new(&tokens);
    if credentials.is_expired() {
        warn!("Google access token for user {user_id} has expired, Google may reject it");
    }

    let request = MeetingRequest::starting_at(Utc::now());
    let calendar =
        GoogleCalendarClient::new(gateway::http_client(config)?, config.google_calendar_base_url());

    let event = calendar
        .insert_event(&credentials, PRIMARY_CALENDAR, &EventRequest::from(&request))
        .await?;

    let meet_link = event.join_link().map(str::to_string).ok_or_else(|| {
        warn!("Google Calendar event {:?} has no Meet link", event.id);
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Provisioning),
        }
    })?;

    info!("Created Google Meet for user {user_id}");
    Ok(meet_link)
}
