use std::sync::Arc;
use std::time::Duration;

use shared_config::AppConfig;
use shared_models::{AppError, UpstreamError};

use crate::bull36::Bull36Client;
use crate::cache::TemplateCache;
use crate::registry::{ActiveUser, UserRegistry};

/// Process-wide state handed to every cell router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<UserRegistry>,
    pub bull36: Arc<Bull36Client>,
    pub template_cache: Arc<TemplateCache>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, UpstreamError> {
        let bull36 = Bull36Client::new(&config)?;

        Ok(Self {
            registry: Arc::new(UserRegistry::from_config(&config)),
            bull36: Arc::new(bull36),
            template_cache: Arc::new(TemplateCache::new(Duration::from_secs(
                config.template_cache_ttl_secs,
            ))),
            config,
        })
    }

    /// Pins the selected account for the rest of the request.
    pub async fn active_user(&self) -> Result<ActiveUser, AppError> {
        self.registry.active().await.ok_or_else(|| {
            AppError::Internal("No active upstream user is configured".to_string())
        })
    }
}
