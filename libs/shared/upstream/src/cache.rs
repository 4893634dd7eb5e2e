use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

struct CachedTemplate {
    fetched_at: Instant,
    body: Value,
}

/// Short-lived cache of the template payload, one entry per user key.
///
/// A zero TTL disables caching entirely.
pub struct TemplateCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedTemplate>>,
}

impl TemplateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, user_key: &str) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.read().await;
        let entry = entries.get(user_key)?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }

        debug!("Template cache hit for '{}'", user_key);
        Some(entry.body.clone())
    }

    pub async fn insert(&self, user_key: &str, body: Value) {
        if !self.is_enabled() {
            return;
        }

        self.entries.write().await.insert(
            user_key.to_string(),
            CachedTemplate {
                fetched_at: Instant::now(),
                body,
            },
        );
    }
}
