pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod forms;
pub mod session;
pub mod utils;

pub use api::{ApiClient, ApiError, ErrorCode};
pub use app::{load_config, AppContext, Config};
pub use session::Session;
pub use utils::BlogdeskError;
