use axum::{extract::Path, http::StatusCode, Json};
use serde_json::Value;

pub async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

/// Responds with whatever status the path names.
pub async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}
