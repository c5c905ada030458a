//! Per-call credential context for outbound provider requests.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

use crate::oauth::token::Tokens;

/// One user's provider credentials, built for a single outbound call.
///
/// A `ProviderCredentials` is created from the caller's own stored tokens right
/// before the call and dropped afterwards. It is never stored on a shared client,
/// so concurrent requests for different users cannot pick up each other's token.
/// Token freshness is not checked here.
pub struct ProviderCredentials {
    access_token: SecretString,
    expired: bool,
}

impl ProviderCredentials {
    /// Build the credential context for one call from a token set.
    pub fn new(tokens: &Tokens) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            expired: tokens.is_expired(),
        }
    }

    /// Whether the access token was already past (or near) its expiry when this
    /// context was built. Informational only; expired tokens are still sent.
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Attach the access token to an outbound request as a bearer credential.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.access_token.expose_secret())
    }
}
