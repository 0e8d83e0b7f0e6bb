/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const PASSWORD_HEADER: &str = "X-Password";

// Session Storage
pub const TOKEN_STORAGE_KEY: &str = "access_token";
pub const SESSION_FILE_NAME: &str = "session.json";
pub const APP_NAME: &str = "blogdesk";
pub const ENV_PREFIX: &str = "BLOGDESK_";
pub const LOCAL_CONFIG_PATH: &str = ".blogdesk/config.toml";

// Listing defaults (same as the blog list view)
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

// Form rules
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

// Fallback message when an error body carries nothing usable
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";
