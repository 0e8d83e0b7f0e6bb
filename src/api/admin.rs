use reqwest::Method;

use super::client::ApiClient;
use super::types::{ApiSuccess, MigrateShardRequest, MigrateShardResponse, ShardDistribution, ShardInfo};
use crate::utils::Result;

// Sharding endpoints for the admin dashboard. The client does no role check
// of its own; whether these are restricted is up to the backend.
impl ApiClient {
    pub async fn list_shards(&self) -> Result<Vec<ShardInfo>> {
        let response: ApiSuccess<Vec<ShardInfo>> = self.call(Method::GET, "/admin/shards").await?;
        Ok(response.data.unwrap_or_default())
    }

    pub async fn shard_distribution(&self) -> Result<ShardDistribution> {
        let response: ApiSuccess<ShardDistribution> =
            self.call(Method::GET, "/admin/shards/distribution").await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Ask the backend to move a user or blog to another shard
    pub async fn migrate_shard(&self, request: &MigrateShardRequest) -> Result<MigrateShardResponse> {
        let response: ApiSuccess<MigrateShardResponse> =
            self.call_with(Method::POST, "/admin/shards/migrate", request).await?;

        Ok(response.data.unwrap_or_else(|| MigrateShardResponse {
            status: Some("success".to_string()),
            message: Some(response.message),
            error: None,
        }))
    }
}
