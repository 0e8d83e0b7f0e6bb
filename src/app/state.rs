use anyhow::{Context, Result};

use super::config::{session_path, Config};
use crate::api::ApiClient;
use crate::session::{FileStorage, Session};

/// Everything a command needs, built once and passed down explicitly
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub session: Session,
    pub client: ApiClient,
}

impl AppContext {
    /// Wire a client to an existing session
    pub fn new(config: Config, session: Session) -> Result<Self> {
        let client = ApiClient::new(&config.api, session.clone())
            .context("Failed to build HTTP client")?;
        Ok(Self {
            config,
            session,
            client,
        })
    }

    /// Restore the persisted session, or start a throwaway one when `ephemeral`
    pub fn open(config: Config, ephemeral: bool) -> Result<Self> {
        let session = if ephemeral {
            Session::in_memory()
        } else {
            let path = session_path(&config)?;
            Session::restore(Box::new(FileStorage::new(&path)))
                .with_context(|| format!("Failed to read session from {}", path.display()))?
        };
        Self::new(config, session)
    }
}
