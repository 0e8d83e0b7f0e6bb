// Gateway module for api - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod admin;
mod client;
mod error;
mod types;

// Public re-exports - the ONLY way to access api functionality
pub use client::ApiClient;
pub use error::{ApiError, ErrorCode};
pub use types::{
    ApiSuccess, Blog, BlogPage, BlogSort, Envelope, ListParams, LoginData, LoginRequest,
    MigrateShardRequest, MigrateShardResponse, NewBlog, Pagination, RegisterRequest,
    ShardCounts, ShardDistribution, ShardEntity, ShardInfo, UpdateBlogRequest,
    UpdateUserRequest, User,
};
