use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use shared_config::{AppConfig, UserCredentials};

/// Snapshot of the selected account, taken once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    pub key: String,
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub key: String,
    pub token: Option<String>,
}

/// Known upstream accounts plus the one currently selected.
///
/// The table is fixed at construction; only the selection changes. A switch is
/// last-writer-wins and is seen by every request that starts after it.
pub struct UserRegistry {
    users: BTreeMap<String, UserCredentials>,
    selected: RwLock<String>,
}

impl UserRegistry {
    pub fn new(users: BTreeMap<String, UserCredentials>, default_key: impl Into<String>) -> Self {
        let default_key = default_key.into();
        if !users.contains_key(&default_key) {
            warn!("Default user '{}' is not registered; upstream calls will fail", default_key);
        }

        Self {
            users,
            selected: RwLock::new(default_key),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.users.clone(), config.default_user.clone())
    }

    /// Selects `key` if it is registered. Unknown keys leave the selection alone.
    pub async fn switch_user(&self, key: &str) -> bool {
        if !self.users.contains_key(key) {
            warn!("Rejected switch to unknown user '{}'", key);
            return false;
        }

        let mut selected = self.selected.write().await;
        info!("Switching active user from '{}' to '{}'", *selected, key);
        *selected = key.to_string();
        true
    }

    pub async fn selected_key(&self) -> String {
        self.selected.read().await.clone()
    }

    pub async fn active_token(&self) -> Option<String> {
        self.active().await.map(|user| user.token)
    }

    pub async fn active_user_id(&self) -> Option<String> {
        self.active().await.map(|user| user.user_id)
    }

    pub async fn active(&self) -> Option<ActiveUser> {
        let selected = self.selected.read().await;
        self.users.get(selected.as_str()).map(|creds| ActiveUser {
            key: selected.clone(),
            token: creds.token.clone(),
            user_id: creds.user_id.clone(),
        })
    }

    pub async fn current_user(&self) -> CurrentUser {
        let selected = self.selected.read().await;
        CurrentUser {
            key: selected.clone(),
            token: self.users.get(selected.as_str()).map(|c| c.token.clone()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }
}
