use taskboard::application::{item_list::ItemListManager, post_feed::PostFeed, shell::ShellContext, store_adapter::StoreAdapter};
use taskboard::config::Config;
use taskboard::http::routes::{posts, shell, tasks};
use taskboard::http::routing;
use taskboard::infrastructure::{http_post_source::HttpPostSource, sqlite_store::SqliteStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let store = SqliteStore::open(&config.database_url).await?;
    let manager = ItemListManager::initialize_with_key(StoreAdapter::new(store), config.storage_key.clone()).await;
    let feed = PostFeed::new(HttpPostSource::new(config.posts_base_url.clone()), config.posts_page_size);

    let router = routing::app(
        shell::router(ShellContext::default())
            .merge(tasks::router(tasks::AppState::new(manager)))
            .merge(posts::router(posts::AppState::new(feed))),
    );

    let addr = config.bind_addr;
    tracing::info!(%addr, database_url = %config.database_url, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
