use std::collections::BTreeMap;
use std::env;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

pub const DEFAULT_USER_KEY: &str = "default";
pub const DEFAULT_BASE_URL: &str = "https://api.bull36.com";

/// Credentials for one upstream account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub token: String,
    #[serde(rename(serialize = "userId"), deserialize_with = "text_or_number")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub base_url: String,
    pub users: BTreeMap<String, UserCredentials>,
    pub default_user: String,
    pub upstream_timeout_secs: u64,
    pub template_cache_ttl_secs: u64,
    pub otp_ttl_secs: u64,
    #[serde(skip)]
    pub otp_hash_secret: Option<String>,
    #[serde(skip)]
    pub host: String,
    #[serde(skip)]
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            users: BTreeMap::new(),
            default_user: DEFAULT_USER_KEY.to_string(),
            upstream_timeout_secs: 30,
            template_cache_ttl_secs: 0,
            otp_ttl_secs: 300,
            otp_hash_secret: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("BULL36_BASE_URL")
            .unwrap_or_else(|_| {
                warn!("BULL36_BASE_URL not set, using default");
                defaults.base_url.clone()
            })
            .trim_end_matches('/')
            .to_string();

        let users = match env::var("BULL36_USERS") {
            Ok(raw) => parse_users(&raw).unwrap_or_else(|e| {
                warn!("BULL36_USERS is not valid JSON ({}), using empty user table", e);
                BTreeMap::new()
            }),
            Err(_) => {
                warn!("BULL36_USERS not set, using empty user table");
                BTreeMap::new()
            }
        };

        let default_user = env::var("BULL36_DEFAULT_USER")
            .unwrap_or_else(|_| defaults.default_user.clone());

        let config = Self {
            default_user: resolve_default_user(&users, default_user),
            users,
            base_url,
            upstream_timeout_secs: env_number(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            ),
            template_cache_ttl_secs: env_number(
                "TEMPLATE_CACHE_TTL_SECS",
                defaults.template_cache_ttl_secs,
            ),
            otp_ttl_secs: env_number("OTP_TTL_SECS", defaults.otp_ttl_secs),
            otp_hash_secret: env::var("OTP_HASH_SECRET").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_number("PORT", defaults.port),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing upstream URL or users");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.users.is_empty()
    }
}

pub fn parse_users(raw: &str) -> Result<BTreeMap<String, UserCredentials>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Falls back to the first registered key when the requested one is unknown.
fn resolve_default_user(users: &BTreeMap<String, UserCredentials>, requested: String) -> String {
    if users.contains_key(&requested) || users.is_empty() {
        return requested;
    }

    let fallback = users.keys().next().cloned().unwrap_or(requested.clone());
    warn!("Default user '{}' not registered, falling back to '{}'", requested, fallback);
    fallback
}

fn env_number<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} is not a valid number, using default", name);
            default
        }),
        Err(_) => default,
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for user_id, got {}",
            other
        ))),
    }
}
