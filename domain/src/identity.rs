//! Resolving who a request belongs to.

use crate::error::{AuthErrorKind, DomainErrorKind, Error};
use crate::gateway::identity::IdentityClient;
use crate::Id;
use entity_api::profile;
use log::*;
use sea_orm::ConnectionTrait;
use service::config::Config;
use service::logging::redact;

/// Resolve the application user a bearer token belongs to.
///
/// An empty token, or one the identity service rejects, is `AuthErrorKind::Unauthenticated`.
pub async fn resolve_caller(config: &Config, bearer_token: &str) -> Result<Id, Error> {
    if bearer_token.trim().is_empty() {
        return Err(Error::auth(AuthErrorKind::Unauthenticated));
    }

    let client = IdentityClient::new(config)?;
    let user = client.get_user(bearer_token).await?;

    debug!("Resolved caller {}", user.id);
    Ok(user.id)
}

/// Find the application user whose profile email exactly matches a Google account email.
///
/// No match, or a failed lookup, is `AuthErrorKind::UserNotFound`.
pub async fn resolve_user_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Id, Error> {
    match profile::find_by_email(db, email).await {
        Ok(Some(profile)) => Ok(profile.id),
        Ok(None) => {
            warn!("No profile matches Google account {}", redact(email));
            Err(Error::auth(AuthErrorKind::UserNotFound))
        }
        Err(e) => {
            warn!("Profile lookup for {} failed: {e:?}", redact(email));
            Err(Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Auth(AuthErrorKind::UserNotFound),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_bearer_token_is_unauthenticated_without_a_remote_call() {
        // No identity service is configured, so reaching it would be a config error.
        let config = Config::from_args(["meet_broker"]);

        let err = resolve_caller(&config, "  ").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Auth(AuthErrorKind::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn resolve_caller_returns_identity_user_id() {
        let mut server = mockito::Server::new_async().await;
        let user_id = Id::new_v4();
        server
            .mock("GET", "/auth/v1/user")
            .match_header("authorization", "Bearer app-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"id":"{user_id}"}}"#))
            .create_async()
            .await;
        let url = server.url();
        let config = Config::from_args([
            "meet_broker",
            "--identity-service-url",
            url.as_str(),
            "--identity-service-key",
            "service-key",
        ]);

        assert_eq!(resolve_caller(&config, "app-token").await.unwrap(), user_id);
    }

    #[cfg(feature = "mock")]
    mod with_db {
        use super::super::*;
        use entity_api::profiles;
        use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

        #[tokio::test]
        async fn resolve_user_by_email_returns_profile_id() {
            let user_id = Id::new_v4();
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![profiles::Model {
                    id: user_id,
                    email: "mentor@example.com".to_string(),
                }]])
                .into_connection();

            let resolved = resolve_user_by_email(&db, "mentor@example.com")
                .await
                .unwrap();

            assert_eq!(resolved, user_id);
        }

        #[tokio::test]
        async fn unknown_email_is_user_not_found() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profiles::Model>::new()])
                .into_connection();

            let err = resolve_user_by_email(&db, "stranger@example.com")
                .await
                .unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Auth(AuthErrorKind::UserNotFound)
            );
        }

        #[tokio::test]
        async fn failed_lookup_is_user_not_found() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection();

            let err = resolve_user_by_email(&db, "mentor@example.com")
                .await
                .unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Auth(AuthErrorKind::UserNotFound)
            );
            assert!(err.source.is_some());
        }
    }
}
