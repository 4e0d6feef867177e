use std::sync::Arc;

use axum::{extract::{Path, Query, State}, routing::{delete, get, post}, Json, Router};
use ::http::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    application::item_list::ItemListManager,
    domain::{item::{FilterMode, Item, ItemId, Stats}, store::KeyValueStore},
    http::types::ApiError,
};

pub struct AppState<S: KeyValueStore> { pub manager: Arc<Mutex<ItemListManager<S>>> }

impl<S: KeyValueStore> AppState<S> {
    pub fn new(manager: ItemListManager<S>) -> Self { Self { manager: Arc::new(Mutex::new(manager)) } }
}

impl<S: KeyValueStore> Clone for AppState<S> {
    fn clone(&self) -> Self { Self { manager: Arc::clone(&self.manager) } }
}

pub fn router<S: KeyValueStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/tasks/stats", get(task_stats::<S>))
        .route("/tasks/clear-completed", post(clear_completed::<S>))
        .route("/tasks/:id/toggle", post(toggle_task::<S>))
        .route("/tasks/:id", delete(delete_task::<S>))
        .with_state(state)
}

#[derive(Deserialize)]
struct ListQuery { filter: Option<String> }

async fn list_tasks<S: KeyValueStore>(State(state): State<AppState<S>>, Query(query): Query<ListQuery>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut manager = state.manager.lock().await;
    if let Some(raw) = query.filter.as_deref() {
        manager.set_filter(raw.parse::<FilterMode>()?);
    }
    let filter = manager.filter();
    let items: Vec<&Item> = manager.visible_items().collect();
    let empty_message = items.is_empty().then(|| filter.empty_message());
    Ok(Json(serde_json::json!({
        "filter": filter,
        "items": items,
        "stats": manager.stats(),
        "can_clear_completed": manager.can_clear_completed(),
        "empty_message": empty_message,
    })))
}

#[derive(Deserialize)]
struct CreateBody { text: String }

async fn create_task<S: KeyValueStore>(State(state): State<AppState<S>>, Json(payload): Json<CreateBody>) -> Result<(StatusCode, Json<Item>), (StatusCode, Json<ApiError>)> {
    let added = state.manager.lock().await.add_item(&payload.text).await;
    match added {
        Some(item) => Ok((StatusCode::CREATED, Json(item))),
        None => Err((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiError { message: "task text is empty".into() }))),
    }
}

async fn toggle_task<S: KeyValueStore>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.manager.lock().await.toggle_item(id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task<S: KeyValueStore>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.manager.lock().await.delete_item(id).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_completed<S: KeyValueStore>(State(state): State<AppState<S>>) -> Json<serde_json::Value> {
    let removed = state.manager.lock().await.clear_completed().await;
    Json(serde_json::json!({ "removed": removed }))
}

async fn task_stats<S: KeyValueStore>(State(state): State<AppState<S>>) -> Json<Stats> {
    Json(state.manager.lock().await.stats())
}

fn parse_id(s: &str) -> Result<ItemId, ApiError> {
    s.parse::<i64>().map(ItemId).map_err(|_| ApiError { message: format!("invalid id: {s}") })
}
