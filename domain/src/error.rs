//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use meeting_auth::error::{
    Error as MeetingAuthError, ErrorKind as MeetingAuthErrorKind, HttpErrorKind, OAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error that caused
/// the domain error. `web` matches on the `error_kind` tree to pick the HTTP status
/// and message, and never depends on `entity_api` or `meeting-auth` directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Auth(AuthErrorKind),
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Who the caller is, and whether they may use Google on this service.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// No bearer token, or the identity service rejected it.
    Unauthenticated,
    /// The Google account's email matches no application profile.
    UserNotFound,
    /// The caller has no stored Google tokens.
    ProviderNotLinked,
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Entity errors translated from `entity_api` and reduced to what the domain layer
/// distinguishes.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    /// Writing a user's Google tokens failed.
    Persistence,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    /// Google rejected the authorization code or returned no access token.
    OAuthExchange,
    /// Google's userinfo call failed or carried no email.
    ProfileFetch,
    /// The Calendar API call failed or returned no join link.
    Provisioning,
    Other(String),
}

impl Error {
    pub(crate) fn with_kind(error_kind: DomainErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub(crate) fn config() -> Self {
        Error::with_kind(DomainErrorKind::Internal(InternalErrorKind::Config))
    }

    pub(crate) fn auth(kind: AuthErrorKind) -> Self {
        Error::with_kind(DomainErrorKind::Auth(kind))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm => EntityErrorKind::Invalid,
            EntityApiErrorKind::RecordNotUpdated => EntityErrorKind::Persistence,
            EntityApiErrorKind::SystemError => {
                EntityErrorKind::Other("EntityErrorKind".to_string())
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<MeetingAuthError> for Error {
    fn from(err: MeetingAuthError) -> Self {
        let error_kind = match &err.error_kind {
            MeetingAuthErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed) => {
                DomainErrorKind::External(ExternalErrorKind::OAuthExchange)
            }
            MeetingAuthErrorKind::OAuth(OAuthErrorKind::UserInfoFailed) => {
                DomainErrorKind::External(ExternalErrorKind::ProfileFetch)
            }
            MeetingAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build HTTP client".to_string()),
            ),
            MeetingAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn entity_api_errors_map_to_entity_kinds() {
        let not_found: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();
        assert_eq!(
            not_found.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );

        let db_failure: Error = EntityApiError::from(DbErr::Custom("boom".to_string())).into();
        assert!(matches!(
            db_failure.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Other(_)))
        ));
        assert!(db_failure.source.is_some());
    }

    #[test]
    fn oauth_errors_map_to_external_kinds() {
        let exchange: Error = meeting_auth::error::oauth_error(
            OAuthErrorKind::TokenExchangeFailed,
            "invalid_grant",
        )
        .into();
        assert_eq!(
            exchange.error_kind,
            DomainErrorKind::External(ExternalErrorKind::OAuthExchange)
        );

        let profile: Error =
            meeting_auth::error::oauth_error(OAuthErrorKind::UserInfoFailed, "no email").into();
        assert_eq!(
            profile.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ProfileFetch)
        );
    }

    #[test]
    fn http_network_errors_map_to_network() {
        let err: Error = MeetingAuthError {
            source: None,
            error_kind: MeetingAuthErrorKind::Http(HttpErrorKind::Network),
        }
        .into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Network)
        );
    }
}
