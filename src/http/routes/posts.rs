use std::sync::Arc;

use axum::{extract::{Query, State}, routing::{get, post}, Json, Router};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    application::post_feed::PostFeed,
    domain::post::{Post, PostSource},
};

pub struct AppState<P: PostSource> { pub feed: Arc<Mutex<PostFeed<P>>> }

impl<P: PostSource> AppState<P> {
    pub fn new(feed: PostFeed<P>) -> Self { Self { feed: Arc::new(Mutex::new(feed)) } }
}

impl<P: PostSource> Clone for AppState<P> {
    fn clone(&self) -> Self { Self { feed: Arc::clone(&self.feed) } }
}

pub fn router<P: PostSource>(state: AppState<P>) -> Router {
    Router::new()
        .route("/api-data", get(show_posts::<P>))
        .route("/api-data/more", post(load_more::<P>))
        .route("/api-data/retry", post(retry::<P>))
        .route("/api-data/reset", post(reset::<P>))
        .with_state(state)
}

#[derive(Deserialize)]
struct SearchQuery { search: Option<String> }

async fn show_posts<P: PostSource>(State(state): State<AppState<P>>, Query(query): Query<SearchQuery>) -> Json<serde_json::Value> {
    let mut feed = state.feed.lock().await;
    // First visit loads page 1.
    if !feed.has_loaded() {
        feed.load_page(1).await;
    }
    if let Some(term) = query.search {
        feed.search(term);
    }
    Json(render(&feed))
}

async fn load_more<P: PostSource>(State(state): State<AppState<P>>) -> Json<serde_json::Value> {
    let mut feed = state.feed.lock().await;
    feed.load_more().await;
    Json(render(&feed))
}

async fn retry<P: PostSource>(State(state): State<AppState<P>>) -> Json<serde_json::Value> {
    let mut feed = state.feed.lock().await;
    feed.retry().await;
    Json(render(&feed))
}

async fn reset<P: PostSource>(State(state): State<AppState<P>>) -> Json<serde_json::Value> {
    let mut feed = state.feed.lock().await;
    feed.reset().await;
    Json(render(&feed))
}

fn render<P: PostSource>(feed: &PostFeed<P>) -> serde_json::Value {
    let posts: Vec<&Post> = feed.filtered().collect();
    serde_json::json!({
        "page": feed.page(),
        "loading": feed.is_loading(),
        "error": feed.error(),
        "search": feed.search_term(),
        "total_loaded": feed.posts().len(),
        "posts": posts,
    })
}
