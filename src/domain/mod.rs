pub mod item;
pub mod post;
pub mod store;
