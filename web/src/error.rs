use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use domain::error::{
    AuthErrorKind, DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind,
    InternalErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Web(WebErrorKind),
}

/// Errors raised by the web layer itself, before any domain operation runs.
#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    /// The request carried no usable `Authorization: Bearer` header.
    Auth,
}

/// JSON error body returned by `/api/*` routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    // List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Web(WebErrorKind::Auth) => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            Error::Domain(domain_error) => match &domain_error.error_kind {
                DomainErrorKind::Auth(auth_error_kind) => match auth_error_kind {
                    AuthErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "Not authenticated")
                    }
                    AuthErrorKind::UserNotFound => (StatusCode::UNAUTHORIZED, "User not found"),
                    AuthErrorKind::ProviderNotLinked => {
                        (StatusCode::FORBIDDEN, "Google tokens not found")
                    }
                },
                DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                    InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                        EntityErrorKind::Persistence => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "Failed to store Google tokens.",
                        ),
                        // Missing profiles and token rows surface as auth kinds, so any
                        // other store error reaching a route is a server fault.
                        EntityErrorKind::NotFound
                        | EntityErrorKind::Invalid
                        | EntityErrorKind::Other(_) => {
                            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                        }
                    },
                    InternalErrorKind::Config => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured")
                    }
                    InternalErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    }
                },
                DomainErrorKind::External(external_error_kind) => match external_error_kind {
                    ExternalErrorKind::Network => (StatusCode::BAD_GATEWAY, "Bad gateway"),
                    ExternalErrorKind::OAuthExchange => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed.")
                    }
                    ExternalErrorKind::ProfileFetch => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to fetch Google profile.",
                    ),
                    ExternalErrorKind::Provisioning => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to create Google Meet.",
                    ),
                    ExternalErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    }
                },
            },
        }
    }

    fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            error!("Responding {status}: {self:?}");
        } else {
            debug!("Responding {status}: {self:?}");
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        self.log(status);
        (
            status,
            Json(ErrorBody {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Error::Domain(err.into())
    }
}

/// Same status mapping as `Error`, rendered as a plain-text body for browser-facing
/// OAuth routes.
#[derive(Debug)]
pub struct PlainTextError(pub Error);

impl IntoResponse for PlainTextError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        self.0.log(status);
        (status, message).into_response()
    }
}

impl From<Error> for PlainTextError {
    fn from(err: Error) -> Self {
        PlainTextError(err)
    }
}

impl From<DomainError> for PlainTextError {
    fn from(err: DomainError) -> Self {
        PlainTextError(Error::Domain(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn domain_error(error_kind: DomainErrorKind) -> Error {
        Error::Domain(DomainError {
            source: None,
            error_kind,
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn provider_not_linked_is_forbidden_json() {
        let response =
            domain_error(DomainErrorKind::Auth(AuthErrorKind::ProviderNotLinked)).into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Google tokens not found"}));
    }

    #[tokio::test]
    async fn missing_bearer_is_unauthorized() {
        let response = Error::Web(WebErrorKind::Auth).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn plain_text_variant_keeps_the_status() {
        let response = PlainTextError(domain_error(DomainErrorKind::External(
            ExternalErrorKind::OAuthExchange,
        )))
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Authentication failed.");
    }

    #[test]
    fn unreachable_identity_service_is_bad_gateway() {
        let (status, _) =
            domain_error(DomainErrorKind::External(ExternalErrorKind::Network))
                .status_and_message();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn stray_store_errors_are_internal_server_errors() {
        for kind in [
            EntityErrorKind::NotFound,
            EntityErrorKind::Invalid,
            EntityErrorKind::Other("connection reset".to_string()),
        ] {
            let (status, message) =
                domain_error(DomainErrorKind::Internal(InternalErrorKind::Entity(kind)))
                    .status_and_message();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Internal server error");
        }
    }

    #[test]
    fn user_not_found_is_unauthorized() {
        let (status, message) =
            domain_error(DomainErrorKind::Auth(AuthErrorKind::UserNotFound)).status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "User not found");
    }
}
