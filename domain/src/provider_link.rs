//! Linking an application user to their Google account.
//!
//! The OAuth callback exchanges the one-time code, reads the Google account email,
//! binds it to the profile with the same email and overwrites that user's stored
//! token set.
use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::oauth::{self, AuthorizationOptions, Provider, Tokens};
use crate::google_tokens::Model as GoogleTokensModel;
use crate::identity;
use crate::Id;
use chrono::Utc;
use entity_api::google_token;
use log::*;
use sea_orm::ConnectionTrait;
use secrecy::{ExposeSecret, SecretString};
use service::config::Config;
use service::logging::redact;

/// Build the Google consent URL the browser is sent to.
pub fn google_authorize_url(config: &Config) -> Result<String, Error> {
    let provider = oauth::google::new_provider(config)?;
    let options = AuthorizationOptions {
        offline_access: true,
        force_consent: config.force_consent,
        state: None,
    };

    Ok(provider.authorization_url(oauth::google::CALENDAR_SCOPES, &options))
}

/// Exchange an authorization code, bind the Google account to an application user by
/// email and store the user's tokens.
///
/// Returns the frontend URL to redirect the browser to. Nothing is written unless the
/// exchange, the profile fetch and the user lookup all succeed.
pub async fn exchange_and_link(
    db: &impl ConnectionTrait,
    config: &Config,
    authorization_code: &str,
) -> Result<String, Error> {
    let provider = oauth::google::new_provider(config)?;
    let provider_name = provider.provider().as_str();
    info!("Processing {provider_name} OAuth callback");

    let tokens = provider
        .exchange_code(authorization_code)
        .await
        .inspect_err(|e| warn!("Failed to exchange Google OAuth code: {e:?}"))?;

    let user_info = provider
        .get_user_info(&tokens.access_token)
        .await
        .inspect_err(|e| warn!("Failed to get Google user info: {e:?}"))?;

    let user_id = identity::resolve_user_by_email(db, &user_info.email).await?;

    upsert_tokens(db, user_id, &tokens).await?;

    info!(
        "Linked {provider_name} account {} to user {}",
        redact(&user_info.email),
        user_id
    );

    Ok(config.frontend_url().to_string())
}

/// Overwrite the token set stored for a user. Any failure is
/// `EntityErrorKind::Persistence`.
pub async fn upsert_tokens(
    db: &impl ConnectionTrait,
    user_id: Id,
    tokens: &Tokens,
) -> Result<GoogleTokensModel, Error> {
    let now = Utc::now();
    let model = GoogleTokensModel {
        user_id,
        access_token: tokens.access_token.expose_secret().to_string(),
        refresh_token: tokens
            .refresh_token
            .as_ref()
            .map(|token| token.expose_secret().to_string()),
        scope: tokens.scope(),
        token_type: tokens.token_type.clone(),
        expiry_date: tokens.expires_at.map(|expires_at| expires_at.into()),
        created_at: now.into(),
        updated_at: now.into(),
    };

    google_token::upsert(db, model).await.map_err(|e| {
        warn!("Failed to store Google tokens for user {user_id}: {e:?}");
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Persistence,
            )),
        }
    })
}

/// Load the token set stored for a user, if they have linked a Google account.
pub async fn load_tokens(db: &impl ConnectionTrait, user_id: Id) -> Result<Option<Tokens>, Error> {
    Ok(google_token::find_by_user_id(db, user_id)
        .await?
        .map(tokens_from_model))
}

/// Whether a user has a stored Google token set.
pub async fn is_linked(db: &impl ConnectionTrait, user_id: Id) -> Result<bool, Error> {
    Ok(google_token::find_by_user_id(db, user_id).await?.is_some())
}

fn tokens_from_model(model: GoogleTokensModel) -> Tokens {
    Tokens {
        access_token: SecretString::new(model.access_token),
        refresh_token: model.refresh_token.map(SecretString::new),
        expires_at: model.expiry_date.map(|expiry| expiry.with_timezone(&Utc)),
        token_type: model.token_type,
        scopes: Tokens::parse_scopes(&model.scope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth_config(google_url: &str) -> Config {
        let auth_url = format!("{google_url}/o/oauth2/v2/auth");
        let token_url = format!("{google_url}/token");
        let userinfo_url = format!("{google_url}/oauth2/v2/userinfo");
        Config::from_args([
            "meet_broker",
            "--google-client-id",
            "client-123",
            "--google-client-secret",
            "secret-456",
            "--google-redirect-uri",
            "http://localhost:5500/auth/google/callback",
            "--google-auth-url",
            auth_url.as_str(),
            "--google-token-url",
            token_url.as_str(),
            "--google-userinfo-url",
            userinfo_url.as_str(),
            "--frontend-url",
            "http://localhost:3000",
        ])
    }

    #[test]
    fn authorize_url_requests_offline_calendar_access() {
        let url = google_authorize_url(&oauth_config("https://accounts.example.com")).unwrap();

        assert!(url.starts_with("https://accounts.example.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar"));
        assert!(url.contains("email"));
    }

    #[test]
    fn authorize_url_omits_prompt_when_consent_is_not_forced() {
        let mut config = oauth_config("https://accounts.example.com");
        config.force_consent = false;

        let url = google_authorize_url(&config).unwrap();

        assert!(!url.contains("prompt=consent"));
    }

    #[test]
    fn authorize_url_without_client_id_is_a_config_error() {
        let err = google_authorize_url(&Config::from_args(["meet_broker"])).unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config)
        );
    }

    #[cfg(feature = "mock")]
    mod with_db {
        use super::*;
        use crate::error::{AuthErrorKind, ExternalErrorKind};
        use crate::profiles;
        use chrono::Duration;
        use mockito::{Matcher, Server};
        use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

        fn token_row(user_id: Id, access_token: &str) -> GoogleTokensModel {
            let now = Utc::now();
            GoogleTokensModel {
                user_id,
                access_token: access_token.to_string(),
                refresh_token: Some("RT1".to_string()),
                scope: "openid email https://www.googleapis.com/auth/calendar".to_string(),
                token_type: "Bearer".to_string(),
                expiry_date: Some((now + Duration::hours(1)).into()),
                created_at: now.into(),
                updated_at: now.into(),
            }
        }

        async fn mock_google(server: &mut Server, email: &str) {
            server
                .mock("POST", "/token")
                .match_body(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("code".into(), "abc123".into()),
                    Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                ]))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(
                    r#"{"access_token":"AT1","refresh_token":"RT1","expires_in":3599,
                        "token_type":"Bearer","scope":"openid email https://www.googleapis.com/auth/calendar"}"#,
                )
                .create_async()
                .await;
            server
                .mock("GET", "/oauth2/v2/userinfo")
                .match_header("authorization", "Bearer AT1")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(format!(r#"{{"id":"g-1","email":"{email}"}}"#))
                .create_async()
                .await;
        }

        #[tokio::test]
        async fn callback_links_known_user_and_redirects_to_frontend() {
            let mut server = Server::new_async().await;
            mock_google(&mut server, "a@x.com").await;
            let user_id = Id::new_v4();

            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![profiles::Model {
                    id: user_id,
                    email: "a@x.com".to_string(),
                }]])
                .append_query_results([vec![token_row(user_id, "AT1")]])
                .into_connection();

            let redirect = exchange_and_link(&db, &oauth_config(&server.url()), "abc123")
                .await
                .unwrap();

            assert_eq!(redirect, "http://localhost:3000");

            let log = db.into_transaction_log();
            assert_eq!(log.len(), 2);
            let upsert = &log[1].statements()[0];
            assert!(upsert.sql.contains(r#"INSERT INTO "google_tokens""#), "{}", upsert.sql);
            assert!(upsert.sql.contains(r#"ON CONFLICT ("user_id") DO UPDATE"#));
            assert!(format!("{:?}", upsert.values).contains("AT1"));
        }

        #[tokio::test]
        async fn unknown_email_writes_nothing() {
            let mut server = Server::new_async().await;
            mock_google(&mut server, "stranger@x.com").await;

            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profiles::Model>::new()])
                .into_connection();

            let err = exchange_and_link(&db, &oauth_config(&server.url()), "abc123")
                .await
                .unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Auth(AuthErrorKind::UserNotFound)
            );
            let log = db.into_transaction_log();
            assert_eq!(log.len(), 1);
            assert!(!log[0].statements()[0].sql.contains("INSERT"));
        }

        #[tokio::test]
        async fn rejected_code_fails_before_any_query() {
            let mut server = Server::new_async().await;
            server
                .mock("POST", "/token")
                .with_status(400)
                .with_body(r#"{"error":"invalid_grant"}"#)
                .create_async()
                .await;
            let userinfo = server
                .mock("GET", "/oauth2/v2/userinfo")
                .expect(0)
                .create_async()
                .await;

            let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

            let err = exchange_and_link(&db, &oauth_config(&server.url()), "bad-code")
                .await
                .unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::External(ExternalErrorKind::OAuthExchange)
            );
            userinfo.assert_async().await;
            assert!(db.into_transaction_log().is_empty());
        }

        #[tokio::test]
        async fn failed_upsert_is_a_persistence_error() {
            let user_id = Id::new_v4();
            let tokens = tokens_from_model(token_row(user_id, "AT1"));
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection();

            let err = upsert_tokens(&db, user_id, &tokens).await.unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Persistence))
            );
        }

        #[tokio::test]
        async fn load_tokens_restores_the_stored_token_set() {
            let user_id = Id::new_v4();
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![token_row(user_id, "AT1")]])
                .into_connection();

            let tokens = load_tokens(&db, user_id).await.unwrap().unwrap();

            assert_eq!(tokens.access_token.expose_secret(), "AT1");
            assert_eq!(
                tokens.refresh_token.as_ref().map(|t| t.expose_secret().as_str()),
                Some("RT1")
            );
            assert_eq!(tokens.scopes.len(), 3);
            assert!(!tokens.is_expired());

            let log = db.into_transaction_log();
            let select = &log[0].statements()[0];
            assert!(
                select
                    .sql
                    .contains(r#"FROM "google_tokens" WHERE "google_tokens"."user_id" = $1"#),
                "{}",
                select.sql
            );
        }

        #[tokio::test]
        async fn is_linked_is_false_without_a_record() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<GoogleTokensModel>::new()])
                .into_connection();

            assert!(!is_linked(&db, Id::new_v4()).await.unwrap());
        }
    }
}
