use axum::{http::Uri, routing::get, Router};

use crate::http::types::ApiError;

/// Wraps the feature routers with the health probe and a JSON 404.
pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> (::http::StatusCode, axum::Json<ApiError>) {
    (::http::StatusCode::NOT_FOUND, axum::Json(ApiError { message: format!("no route for {}", uri.path()) }))
}
