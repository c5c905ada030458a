//! Google OAuth provider implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{oauth_error, oauth_error_from, Error, OAuthErrorKind};
use crate::oauth::token::Tokens;
use crate::oauth::{AuthorizationOptions, ProviderKind, UserInfo};

/// Scopes needed to create Meet-backed calendar events and to read the account email.
pub const CALENDAR_SCOPES: &[&str] = &[
    "openid",
    "email",
    "https://www.googleapis.com/auth/calendar",
];

/// Google OAuth endpoints. Configurable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: String,
}

/// Authorization code grant form body.
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'static str,
}

/// Userinfo endpoint response.
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    verified_email: Option<bool>,
}

/// Google OAuth provider.
///
/// Handles OAuth 2.0 flows for Google accounts:
/// - Consent URL generation
/// - Authorization code exchange
/// - User info retrieval from Google APIs
pub struct Provider {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    endpoints: Endpoints,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Google OAuth provider.
    ///
    /// # Arguments
    ///
    /// * `client_id` - Google OAuth client ID
    /// * `client_secret` - Google OAuth client secret
    /// * `redirect_uri` - OAuth redirect URI registered with Google
    /// * `endpoints` - Consent, token and userinfo URLs
    /// * `http_client` - Client used for the token and userinfo calls
    pub fn new(
        client_id: String,
        client_secret: SecretString,
        redirect_uri: String,
        endpoints: Endpoints,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            endpoints,
            http_client,
        }
    }
}

/// Absolute expiry for a token that lives `seconds` from now, or `None` when it is not
/// representable.
fn expiry_from_now(seconds: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(seconds).and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn authorization_url(&self, scopes: &[&str], options: &AuthorizationOptions) -> String {
        let mut url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.endpoints.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes.join(" ")),
        );

        if options.offline_access {
            url.push_str("&access_type=offline");
        }
        if options.force_consent {
            url.push_str("&prompt=consent");
        }
        if let Some(state) = &options.state {
            url.push_str("&state=");
            url.push_str(&urlencoding::encode(state));
        }

        url
    }

    async fn exchange_code(&self, code: &str) -> Result<Tokens, Error> {
        let request = TokenExchangeRequest {
            code,
            client_id: &self.client_id,
            client_secret: self.client_secret.expose_secret(),
            redirect_uri: &self.redirect_uri,
            grant_type: "authorization_code",
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .http_client
            .post(&self.endpoints.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Google token endpoint: {:?}", e);
                oauth_error_from(OAuthErrorKind::TokenExchangeFailed, e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google rejected authorization code ({}): {}", status, error_text);
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &format!("token endpoint returned {status}"),
            ));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Google token response: {:?}", e);
            oauth_error_from(OAuthErrorKind::TokenExchangeFailed, e)
        })?;

        let access_token = body
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Google token response carried no access token");
                oauth_error(OAuthErrorKind::TokenExchangeFailed, "no access token returned")
            })?;

        let expires_at = match body.expires_in {
            Some(seconds) => Some(expiry_from_now(seconds).ok_or_else(|| {
                warn!("Google token response carried an out of range expires_in: {seconds}");
                oauth_error(OAuthErrorKind::TokenExchangeFailed, "expires_in out of range")
            })?),
            None => None,
        };

        info!(
            "Exchanged Google OAuth code (refresh token issued: {})",
            body.refresh_token.is_some()
        );

        Ok(Tokens {
            access_token: SecretString::new(access_token),
            refresh_token: body.refresh_token.map(SecretString::new),
            expires_at,
            token_type: body.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scopes: Tokens::parse_scopes(&body.scope),
        })
    }

    async fn get_user_info(&self, access_token: &SecretString) -> Result<UserInfo, Error> {
        let response = self
            .http_client
            .get(&self.endpoints.userinfo_url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Google userinfo endpoint: {:?}", e);
                oauth_error_from(OAuthErrorKind::UserInfoFailed, e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Google userinfo returned {}", status);
            return Err(oauth_error(
                OAuthErrorKind::UserInfoFailed,
                &format!("userinfo endpoint returned {status}"),
            ));
        }

        let body: UserInfoResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Google userinfo response: {:?}", e);
            oauth_error_from(OAuthErrorKind::UserInfoFailed, e)
        })?;

        let email = body.email.filter(|email| !email.is_empty()).ok_or_else(|| {
            warn!("Google userinfo response carried no email");
            oauth_error(OAuthErrorKind::UserInfoFailed, "no email in profile")
        })?;

        Ok(UserInfo {
            id: body.id,
            email,
            name: body.name,
            picture: body.picture,
            verified_email: body.verified_email,
        })
    }
}
