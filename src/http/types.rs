use axum::response::{IntoResponse, Response};
use ::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError { pub message: String }

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (StatusCode::BAD_REQUEST, axum::Json(self)).into_response() }
}

impl From<String> for ApiError {
    fn from(message: String) -> Self { Self { message } }
}
