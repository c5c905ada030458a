use axum::http::{header, HeaderValue, Method};
use log::*;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use service::AppState;

mod controller;
mod error;
mod extractors;
mod router;

pub use error::{Error, PlainTextError, WebErrorKind};

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", interface, app_state.config.port);

    info!(
        "Starting server on {server_url} (provisioning mode: {})",
        app_state.config.provisioning_mode
    );

    let cors_layer = cors_layer(&app_state.config.cors_origins());
    let listener = TcpListener::bind(&server_url).await?;

    axum::serve(
        listener,
        router::define_routes(app_state)
            .layer(cors_layer)
            .into_make_service(),
    )
    .await
}

/// Explicit origin allow-list with credentials, limited to the methods and headers the
/// frontend sends.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|e| warn!("Ignoring invalid CORS origin {origin}: {e}"))
                .ok()
        })
        .collect();

    info!("CORS allowed origins: {origins:?}");

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route("/", get(|| async { "ok" })).layer(cors_layer(&[
            "http://localhost:3000".to_string(),
            "not a header\nvalue".to_string(),
        ]))
    }

    #[tokio::test]
    async fn allowed_origin_is_echoed_with_credentials() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
