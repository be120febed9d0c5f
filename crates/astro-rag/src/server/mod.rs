//! HTTP server for the AstroAI service

pub mod routes;
pub mod state;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{RagConfig, ServerConfig};
use crate::error::{Error, Result};
use state::AppState;

/// AstroAI HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new server; the index is loaded or built before this returns
    pub async fn new(config: RagConfig, force_rebuild: bool) -> Result<Self> {
        let state = AppState::new(config.clone(), force_rebuild).await?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting AstroAI server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Router over the given state
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().server);

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .route("/generate", post(routes::generate::generate))
        .nest("/api", routes::api_routes())
        .with_state(state)
        // Middleware layers (applied bottom to top)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Only an empty origin list opens CORS to any origin; unparseable entries never widen it
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::testing::{app_state, app_state_with_config, ScriptedGenerator, StubRetriever};

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(app_state(StubRetriever::empty(), Arc::new(ScriptedGenerator::empty())));

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_readiness_follows_flag() {
        let state = app_state(StubRetriever::empty(), Arc::new(ScriptedGenerator::empty()));
        let app = router(state.clone());

        let response = app.clone().oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        state.set_ready(false);
        let response = app.oneshot(get_request("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_info_reports_pipeline() {
        let app = router(app_state(StubRetriever::empty(), Arc::new(ScriptedGenerator::empty())));

        let response = app.oneshot(get_request("/api/info")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "astro-rag");
        assert_eq!(json["retrieval"]["top_k"], 4);
        assert_eq!(json["generation"]["provider"], "scripted");
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = router(app_state(StubRetriever::empty(), Arc::new(ScriptedGenerator::empty())));
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:8080")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8080"
        );
    }

    fn origin_request(origin: &str) -> Request<Body> {
        Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_invalid_origins_do_not_allow_any() {
        let mut config = RagConfig::default();
        config.server.allowed_origins = vec!["http://bad\norigin".to_string()];
        let app = router(app_state_with_config(
            config,
            StubRetriever::empty(),
            Arc::new(ScriptedGenerator::empty()),
        ));

        let response = app.oneshot(origin_request("http://evil.example")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_empty_origin_list_allows_any() {
        let mut config = RagConfig::default();
        config.server.allowed_origins = Vec::new();
        let app = router(app_state_with_config(
            config,
            StubRetriever::empty(),
            Arc::new(ScriptedGenerator::empty()),
        ));

        let response = app.oneshot(origin_request("http://evil.example")).await.unwrap();

        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
