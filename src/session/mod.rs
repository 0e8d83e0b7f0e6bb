/// Session management module - Gateway

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, TokenStorage};
pub use store::Session;
