//! Clients for the remote services the broker talks to.

use crate::error::Error;
use meeting_auth::http::HttpClientBuilder;
use service::config::Config;

pub mod google_calendar;
pub mod identity;
pub mod oauth;

/// Client builder preset with the broker's timeout and user agent.
pub(crate) fn http_client_builder(config: &Config) -> HttpClientBuilder {
    HttpClientBuilder::new()
        .with_timeout(config.http_timeout())
        .with_user_agent(user_agent())
}

/// Builds the plain HTTP client shared by all outbound calls of one request.
/// It carries no credentials; each call attaches its own.
pub(crate) fn http_client(config: &Config) -> Result<reqwest::Client, Error> {
    Ok(http_client_builder(config).build()?)
}

pub(crate) fn user_agent() -> String {
    format!("meet-broker/{}", env!("CARGO_PKG_VERSION"))
}
