use axum::{extract::State, routing::{get, post}, Json, Router};

use crate::application::shell::ShellContext;

pub fn router(shell: ShellContext) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/counter/increment", post(increment))
        .route("/counter/decrement", post(decrement))
        .route("/theme", get(theme))
        .route("/theme/toggle", post(toggle_theme))
        .with_state(shell)
}

async fn home(State(shell): State<ShellContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "count": shell.count(), "theme": shell.theme() }))
}

async fn increment(State(shell): State<ShellContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "count": shell.increment() }))
}

async fn decrement(State(shell): State<ShellContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "count": shell.decrement() }))
}

async fn theme(State(shell): State<ShellContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "theme": shell.theme() }))
}

async fn toggle_theme(State(shell): State<ShellContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "theme": shell.toggle_theme() }))
}
