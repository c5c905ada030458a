//! OAuth provider trait and types.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::token::Tokens;
use crate::error::Error;

/// Known OAuth providers for video meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Google,
}

impl ProviderKind {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
        }
    }
}

/// Options for the consent URL that are independent of the requested scopes.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationOptions {
    /// Request `access_type=offline` so a refresh token is issued.
    pub offline_access: bool,
    /// Request `prompt=consent` so the refresh token is re-issued even when the
    /// user has already consented.
    pub force_consent: bool,
    /// Opaque value echoed back on the callback.
    pub state: Option<String>,
}

/// User information retrieved from OAuth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// Provider's unique user identifier.
    pub id: Option<String>,
    /// User's email address. Always present: a userinfo response without one is an error.
    pub email: String,
    /// User's display name.
    pub name: Option<String>,
    /// User's profile picture URL.
    pub picture: Option<String>,
    /// Whether the email is verified.
    pub verified_email: Option<bool>,
}

/// Trait for OAuth 2.0 providers.
///
/// Implementations hold only static client configuration; no user's tokens are ever
/// stored on the provider, so one instance may serve concurrent requests for
/// different users.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider kind.
    fn provider(&self) -> ProviderKind;

    /// Build the consent URL the browser is redirected to.
    ///
    /// # Arguments
    ///
    /// * `scopes` - Scopes to request
    /// * `options` - Offline access, forced consent and state
    fn authorization_url(&self, scopes: &[&str], options: &AuthorizationOptions) -> String;

    /// Exchange a one-time authorization code for tokens.
    ///
    /// Fails with `OAuthErrorKind::TokenExchangeFailed` when the provider rejects the
    /// code or returns no access token.
    async fn exchange_code(&self, code: &str) -> Result<Tokens, Error>;

    /// Fetch the profile that belongs to an access token.
    ///
    /// Fails with `OAuthErrorKind::UserInfoFailed` when the call errors or the
    /// profile carries no email.
    async fn get_user_info(&self, access_token: &SecretString) -> Result<UserInfo, Error>;
}
