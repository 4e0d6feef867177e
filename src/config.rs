use std::net::SocketAddr;

use anyhow::Context;

use crate::application::{item_list::DEFAULT_STORAGE_KEY, post_feed::DEFAULT_PAGE_SIZE};
use crate::infrastructure::http_post_source::DEFAULT_POSTS_URL;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub storage_key: String,
    pub bind_addr: SocketAddr,
    pub posts_base_url: String,
    pub posts_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://tasks.db".to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            posts_base_url: DEFAULT_POSTS_URL.to_string(),
            posts_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Config::default();
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().with_context(|| format!("invalid BIND_ADDR: {raw}"))?,
            None => defaults.bind_addr,
        };
        let posts_page_size = match lookup("POSTS_PAGE_SIZE") {
            Some(raw) => raw.parse::<u32>().with_context(|| format!("invalid POSTS_PAGE_SIZE: {raw}"))?,
            None => defaults.posts_page_size,
        };
        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            storage_key: lookup("TASKS_STORAGE_KEY").unwrap_or(defaults.storage_key),
            bind_addr,
            posts_base_url: lookup("POSTS_BASE_URL").unwrap_or(defaults.posts_base_url),
            posts_page_size,
        })
    }
}
