// Gateway module for utils - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod logger;
mod notify;

// Public re-exports - the ONLY way to access utils functionality
pub use errors::{BlogdeskError, Reported, Result};
pub use logger::init_logger;
pub use notify::{notify_error, notify_info, notify_success};
