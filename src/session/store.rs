use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use super::storage::{MemoryStorage, TokenStorage};
use crate::api::{ApiClient, ApiSuccess, LoginData, LoginRequest};
use crate::constants::TOKEN_STORAGE_KEY;
use crate::utils::Result;

/// Shared handle to the current bearer token.
///
/// Clones share the same token, so the API client and the session store
/// always agree on whether the user is signed in. Every change is written
/// through to the backing [`TokenStorage`] so a later process can
/// [`restore`](Session::restore) it.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    token: RwLock<Option<String>>,
    storage: Box<dyn TokenStorage>,
}

impl Session {
    /// Signed-out session over the given storage
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self::with_token(storage, None)
    }

    /// Session that picks up whatever token the storage already holds
    pub fn restore(storage: Box<dyn TokenStorage>) -> Result<Self> {
        let token = storage.get(TOKEN_STORAGE_KEY)?.filter(|t| !t.is_empty());
        if token.is_some() {
            debug!("Restored session from {}", storage.location());
        }
        Ok(Self::with_token(storage, token))
    }

    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    fn with_token(storage: Box<dyn TokenStorage>, token: Option<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                storage,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }

    pub fn storage_location(&self) -> String {
        self.inner.storage.location()
    }

    /// Store a new token, persisting it before it becomes visible
    pub fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.inner.storage.set(TOKEN_STORAGE_KEY, &token)?;
        *self.inner.token.write() = Some(token);
        Ok(())
    }

    /// Forget the token. The in-memory value is dropped even if storage fails.
    pub fn clear(&self) -> Result<()> {
        self.inner.token.write().take();
        self.inner.storage.remove(TOKEN_STORAGE_KEY)?;
        Ok(())
    }

    /// Log in through `client` and keep the returned token.
    ///
    /// A failed call leaves the session exactly as it was and hands the
    /// backend error back unchanged.
    pub async fn login(
        &self,
        client: &ApiClient,
        credentials: &LoginRequest,
    ) -> Result<ApiSuccess<LoginData>> {
        let response = client.login(credentials).await?;
        if let Some(data) = &response.data {
            self.set_token(data.access_token.clone())?;
            info!("Logged in as {}", credentials.username_email);
        }
        Ok(response)
    }

    pub fn logout(&self) -> Result<()> {
        self.clear()?;
        info!("Logged out");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("storage", &self.storage_location())
            .finish()
    }
}
