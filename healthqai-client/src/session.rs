use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::{ACCESS_TOKEN_KEY, SessionStorage};

/// Client-held authentication status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Owns the [`Session`]. Only the token is written through to durable
/// storage; the role is looked up again after a restart.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    session: RwLock<Session>,
}

impl SessionStore {
    /// Restore the session from storage.
    pub async fn load(storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let token = storage
            .get(ACCESS_TOKEN_KEY)
            .await?
            .filter(|token| !token.is_empty());
        if token.is_some() {
            info!("Restored stored access token");
        }

        Ok(Self {
            storage,
            session: RwLock::new(Session { token, role: None }),
        })
    }

    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    /// Persist a new token. Any role held for a previous token is dropped.
    pub async fn set_token(&self, token: String) -> Result<()> {
        self.storage.save(ACCESS_TOKEN_KEY, token.clone()).await?;
        let mut session = self.session.write().await;
        session.token = Some(token);
        session.role = None;
        Ok(())
    }

    pub async fn set_role(&self, role: String) {
        let mut session = self.session.write().await;
        if session.token.is_some() {
            session.role = Some(role);
        } else {
            warn!("Ignoring role update for a session without token");
        }
    }

    /// Forget token and role. In-memory state is cleared even when the
    /// durable delete fails.
    pub async fn clear(&self) {
        *self.session.write().await = Session::default();
        if let Err(e) = self.storage.delete(ACCESS_TOKEN_KEY).await {
            warn!("Failed to remove stored access token: {}", e);
        }
    }
}
