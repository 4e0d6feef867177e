pub mod http_post_source;
pub mod memory_store;
pub mod sqlite_store;
