use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Query, Request},
    http::{header, request::Parts, HeaderMap, HeaderName},
};
use futures::stream;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::warn;

use crate::domain::ports::RequestAccessor;
use crate::infrastructure::config::LoggerConfig;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const UNKNOWN_IP: &str = "unknown";

/// Request head plus input, read before the handler runs.
#[derive(Debug, Clone)]
pub struct HttpRequestView {
    url: String,
    method: String,
    ip: String,
    input: Option<Map<String, Value>>,
}

impl HttpRequestView {
    /// Builds the view and hands back a request the handler can still consume.
    ///
    /// Query parameters form the input; a small JSON object body is merged on
    /// top. The body bytes are buffered and put back unchanged.
    pub async fn capture(request: Request, config: &LoggerConfig) -> (Self, Request) {
        let (parts, body) = request.into_parts();
        let mut input = query_params(&parts);

        let body = if is_small_json(&parts.headers, config.max_input_bytes) {
            match axum::body::to_bytes(body, config.max_input_bytes).await {
                Ok(bytes) => {
                    if let Ok(Value::Object(fields)) = serde_json::from_slice(&bytes) {
                        input.extend(fields);
                    }
                    Body::from(bytes)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to buffer request body for logging");
                    // Hand the failure on so the handler sees the broken upload.
                    Body::from_stream(stream::once(async move { Err::<Bytes, _>(e) }))
                }
            }
        } else {
            body
        };

        let view = Self {
            url: parts.uri.path().to_string(),
            method: parts.method.to_string(),
            ip: client_ip(&parts, config.trust_proxy),
            input: (!input.is_empty()).then_some(input),
        };

        (view, Request::from_parts(parts, body))
    }
}

impl RequestAccessor for HttpRequestView {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn method(&self) -> String {
        self.method.clone()
    }

    fn input(&self) -> Option<Map<String, Value>> {
        self.input.clone()
    }

    fn ip(&self) -> String {
        self.ip.clone()
    }
}

fn query_params(parts: &Parts) -> Map<String, Value> {
    Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(params)| {
            params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        })
        .unwrap_or_default()
}

fn is_small_json(headers: &HeaderMap, max_bytes: usize) -> bool {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));

    let fits = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .is_some_and(|len| len <= max_bytes);

    is_json && fits
}

fn client_ip(parts: &Parts, trust_proxy: bool) -> String {
    let forwarded = parts
        .headers
        .get(X_FORWARDED_FOR)
        .filter(|_| trust_proxy)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_request(uri: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_capture_merges_query_and_json_body() {
        let request = json_request("/users?page=2&a=0", r#"{"a":1,"name":"x"}"#);

        let (view, request) = HttpRequestView::capture(request, &LoggerConfig::default()).await;

        assert_eq!(view.url(), "/users");
        assert_eq!(view.method(), "POST");
        let input = view.input().unwrap();
        assert_eq!(input["page"], json!("2"));
        assert_eq!(input["a"], json!(1));
        assert_eq!(input["name"], json!("x"));

        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"a":1,"name":"x"}"#);
    }

    #[tokio::test]
    async fn test_capture_without_input() {
        let request = axum::http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (view, _) = HttpRequestView::capture(request, &LoggerConfig::default()).await;

        assert!(view.input().is_none());
        assert_eq!(view.ip(), UNKNOWN_IP);
    }

    #[tokio::test]
    async fn test_capture_skips_oversized_body() {
        let config = LoggerConfig {
            max_input_bytes: 4,
            ..LoggerConfig::default()
        };
        let request = json_request("/users", r#"{"a":1}"#);

        let (view, request) = HttpRequestView::capture(request, &config).await;

        assert!(view.input().is_none());
        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_capture_keeps_body_error_for_handler() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from(r#"{"a""#)),
            Err(std::io::ErrorKind::ConnectionReset.into()),
        ];
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, 16)
            .body(Body::from_stream(stream::iter(chunks)))
            .unwrap();

        let (view, request) = HttpRequestView::capture(request, &LoggerConfig::default()).await;

        assert!(view.input().is_none());
        let body = axum::body::to_bytes(request.into_body(), usize::MAX).await;
        assert!(body.is_err());
    }

    #[tokio::test]
    async fn test_capture_ignores_non_json_body() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::CONTENT_LENGTH, 7)
            .body(Body::from(r#"{"a":1}"#))
            .unwrap();

        let (view, _) = HttpRequestView::capture(request, &LoggerConfig::default()).await;

        assert!(view.input().is_none());
    }

    #[tokio::test]
    async fn test_ip_from_connect_info() {
        let mut request = axum::http::Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.9")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

        let (view, _) = HttpRequestView::capture(request, &LoggerConfig::default()).await;

        assert_eq!(view.ip(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_ip_from_forwarded_header_when_trusted() {
        let config = LoggerConfig {
            trust_proxy: true,
            ..LoggerConfig::default()
        };
        let request = axum::http::Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        let (view, _) = HttpRequestView::capture(request, &config).await;

        assert_eq!(view.ip(), "203.0.113.9");
    }
}
