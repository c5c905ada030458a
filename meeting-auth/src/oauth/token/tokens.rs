//! OAuth token types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// OAuth tokens with metadata.
///
/// Token values are `SecretString`s, so `Debug` output (and therefore any log line
/// formatting a `Tokens`) never contains them.
#[derive(Debug, Clone)]
pub struct Tokens {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token, only issued when offline access was requested.
    pub refresh_token: Option<SecretString>,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
}

impl Tokens {
    /// Check if the access token is expired or about to expire soon.
    ///
    /// Returns true if token is expired or will expire within 5 minutes.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires| {
                let now = Utc::now();
                let buffer = chrono::Duration::minutes(5);
                expires <= (now + buffer)
            })
            .unwrap_or(false)
    }

    /// Scopes joined the way OAuth transmits them (space separated).
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Splits an OAuth `scope` string into individual scopes.
    pub fn parse_scopes(scope: &str) -> Vec<String> {
        scope.split_whitespace().map(str::to_string).collect()
    }
}
