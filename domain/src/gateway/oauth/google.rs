//! Google OAuth client.
//!
//! Provides a Google OAuth provider configured from the service `Config`.

use crate::error::Error;
use crate::gateway;
use meeting_auth::oauth::providers::google::{Endpoints, Provider as GoogleProvider};
use secrecy::SecretString;
use service::config::Config;

pub use meeting_auth::oauth::providers::google::CALENDAR_SCOPES;

/// Create a Google OAuth provider from the service configuration.
///
/// Fails with `InternalErrorKind::Config` when the client ID, client secret or
/// redirect URI is not configured.
pub fn new_provider(config: &Config) -> Result<GoogleProvider, Error> {
    let client_id = config.google_client_id().ok_or_else(Error::config)?;
    let client_secret = config.google_client_secret().ok_or_else(Error::config)?;
    let redirect_uri = config.google_redirect_uri().ok_or_else(Error::config)?;

    let endpoints = Endpoints {
        auth_url: config.google_auth_url().to_string(),
        token_url: config.google_token_url().to_string(),
        userinfo_url: config.google_userinfo_url().to_string(),
    };

    Ok(GoogleProvider::new(
        client_id,
        SecretString::new(client_secret),
        redirect_uri,
        endpoints,
        gateway::http_client(config)?,
    ))
}
