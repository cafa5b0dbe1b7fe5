use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::domain::{ports::AuthAccessor, UserId};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// User resolved from a known API key, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
}

impl AuthAccessor for AuthenticatedUser {
    fn user_id(&self) -> Option<UserId> {
        Some(self.id.clone())
    }
}

/// Attaches an [`AuthenticatedUser`] when `X-API-Key` matches a configured
/// key. Unknown or missing keys pass through anonymously.
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|key| state.config.auth.api_keys.get(key))
        .cloned();

    if let Some(id) = user {
        request.extensions_mut().insert(AuthenticatedUser { id });
    }

    next.run(request).await
}
