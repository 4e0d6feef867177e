pub mod item_list;
pub mod post_feed;
pub mod shell;
pub mod store_adapter;

mod item_list_tests;
