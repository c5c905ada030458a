use crate::{
    controller::{
        auth_status_controller, health_check_controller, meeting_controller, oauth_controller,
        CheckAuthResponse, MeetLinkResponse,
    },
    error::ErrorBody,
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Google Meet OAuth Broker API"
        ),
        paths(
            health_check_controller::root,
            health_check_controller::health_check,
            oauth_controller::authorize,
            oauth_controller::callback,
            meeting_controller::create_google_meet,
            auth_status_controller::check_auth,
        ),
        components(
            schemas(
                CheckAuthResponse,
                ErrorBody,
                MeetLinkResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "meet_broker", description = "Google Calendar OAuth linking and Meet provisioning")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the application bearer token issued by the identity service as the
// authentication requirement for the `/api` endpoints.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(app_state.clone()))
        .merge(meeting_routes(app_state.clone()))
        .merge(auth_status_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new()
        .route("/", get(health_check_controller::root))
        .route("/health", get(health_check_controller::health_check))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/google", get(oauth_controller::authorize))
        .route("/auth/google/callback", get(oauth_controller::callback))
        .with_state(app_state)
}

fn meeting_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/create-google-meet",
            post(meeting_controller::create_google_meet),
        )
        .with_state(app_state)
}

fn auth_status_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/check-auth", get(auth_status_controller::check_auth))
        .with_state(app_state)
}
