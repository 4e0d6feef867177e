pub mod posts;
pub mod shell;
pub mod tasks;
