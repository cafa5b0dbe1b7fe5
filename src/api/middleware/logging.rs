use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use tracing::{error, Instrument, Span};

use crate::api::middleware::{AuthenticatedUser, HttpRequestView, NotifyingBody};
use crate::api::state::AppState;
use crate::application::{completion, RequestLogger};

/// Logs every request once its response has been fully sent or has failed.
///
/// Must sit inside [`api_key_auth`](super::api_key_auth) so the user is known
/// when the hook is armed.
pub async fn request_logger(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let config = state.config.logger;
    let (view, request) = HttpRequestView::capture(request, &config).await;
    let auth = request.extensions().get::<AuthenticatedUser>().cloned();
    let is_head = request.method() == Method::HEAD;

    let (notifier, signal) = completion::channel();
    let backend = state.log_backend.clone();
    let pending = RequestLogger::new(view, signal, auth, backend, &config).hook();
    tokio::spawn(
        async move {
            if let Err(e) = pending.await {
                error!(error = %e, "Failed to write request log");
            }
        }
        .instrument(Span::current()),
    );

    let response = next.run(request).await;
    let status_code = response.status().as_u16();

    // HEAD responses never transmit their body.
    if is_head {
        notifier.finished(status_code);
        return response;
    }

    response.map(|body| Body::new(NotifyingBody::new(body, status_code, notifier)))
}
