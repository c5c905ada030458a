//! Client for the hosted identity service that issues application bearer tokens.
//!
//! The service exposes `GET /auth/v1/user`, which answers with the user a bearer
//! token belongs to. Calls carry the service credential in an `apikey` header next to
//! the caller's own token.

use crate::error::{AuthErrorKind, DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway;
use crate::Id;
use log::*;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use service::config::Config;

/// The user a bearer token belongs to.
#[derive(Debug, Deserialize)]
pub struct IdentityUser {
    pub id: Id,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Create a client from the configured identity service URL and key.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base_url = config.identity_service_url().ok_or_else(Error::config)?;
        let service_key = config
            .identity_service_key()
            .map(SecretString::new)
            .ok_or_else(Error::config)?;

        let mut headers = HeaderMap::new();
        let mut api_key =
            HeaderValue::from_str(service_key.expose_secret()).map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            })?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let client = gateway::http_client_builder(config)
            .with_default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Look up the user a bearer token belongs to.
    ///
    /// A 401 or 403 from the identity service means the token is invalid or expired
    /// and becomes `AuthErrorKind::Unauthenticated`.
    pub async fn get_user(&self, bearer_token: &str) -> Result<IdentityUser, Error> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(bearer_token)
            .send()
            .await
            .inspect_err(|e| warn!("Failed to reach identity service: {e:?}"))?;

        match response.status() {
            status if status.is_success() => response.json::<IdentityUser>().await.map_err(|e| {
                warn!("Failed to parse identity service user: {e:?}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Malformed identity service response".to_string(),
                    )),
                }
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Identity service rejected bearer token");
                Err(Error::auth(AuthErrorKind::Unauthenticated))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                warn!("Identity service returned {status}: {error_text}");
                Err(Error {
                    source: None,
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                        "Identity service returned {status}"
                    ))),
                })
            }
        }
    }
}
