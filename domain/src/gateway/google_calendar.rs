//! Google Calendar v3 client, used to create events with an attached Meet conference.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use meeting_auth::credentials::ProviderCredentials;
use serde::{Deserialize, Serialize};

/// Calendar every event is inserted into.
pub const PRIMARY_CALENDAR: &str = "primary";

/// Event insert body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub conference_data: ConferenceData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339 timestamp.
    pub date_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    pub create_request: CreateConferenceRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    /// Client-chosen id; Google ignores repeats of the same id for the same event.
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub kind: String,
}

/// The subset of the created event the broker reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub hangout_link: Option<String>,
    #[serde(default)]
    pub conference_data: Option<ConferenceDataResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceDataResponse {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(default)]
    pub entry_point_type: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

impl EventResponse {
    /// The Meet join link: `hangoutLink`, else the first video entry point.
    pub fn join_link(&self) -> Option<&str> {
        self.hangout_link
            .as_deref()
            .filter(|link| !link.is_empty())
            .or_else(|| {
                self.conference_data
                    .as_ref()?
                    .entry_points
                    .iter()
                    .find(|entry| entry.entry_point_type.as_deref() == Some("video"))?
                    .uri
                    .as_deref()
            })
    }
}

/// Calendar client. Holds no user credentials; each call is given the caller's own.
pub struct GoogleCalendarClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Insert an event with `conferenceDataVersion=1` so Google attaches the requested
    /// conference. Every failure becomes `ExternalErrorKind::Provisioning`.
    pub async fn insert_event(
        &self,
        credentials: &ProviderCredentials,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<EventResponse, Error> {
        let url = format!("{}/calendars/{}/events", self.base_url, calendar_id);

        let request = self
            .client
            .post(&url)
            .query(&[("conferenceDataVersion", "1")])
            .json(event);

        let response = credentials
            .authorize(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Google Calendar: {e:?}");
                provisioning_error(Some(Box::new(e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google Calendar rejected event insert ({status}): {error_text}");
            return Err(provisioning_error(None));
        }

        let event: EventResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Google Calendar event: {e:?}");
            provisioning_error(Some(Box::new(e)))
        })?;

        debug!("Created Google Calendar event {:?}", event.id);
        Ok(event)
    }
}

fn provisioning_error(source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error {
        source,
        error_kind: DomainErrorKind::External(ExternalErrorKind::Provisioning),
    }
}
