pub mod demo;
pub mod health;

use axum::extract::Request;
use axum::{middleware, routing::get, routing::post, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use crate::api::middleware::{api_key_auth, request_logger};
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/echo", post(demo::echo))
        .route("/status/{code}", get(demo::status).post(demo::status))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(make_request_span)
                        .on_request(())
                        .on_response(()),
                )
                // Auth runs first so the request logger sees the user.
                .layer(middleware::from_fn_with_state(state.clone(), api_key_auth))
                .layer(middleware::from_fn_with_state(state.clone(), request_logger)),
        )
        .with_state(state)
}

fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{Config, MemoryBackend};
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(Config::default(), Arc::new(MemoryBackend::new())))
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let request = axum::http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_status_route_echoes_code() {
        let request = axum::http::Request::builder()
            .uri("/status/418")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
