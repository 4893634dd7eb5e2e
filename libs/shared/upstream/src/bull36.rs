use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::UpstreamError;

use crate::registry::ActiveUser;

pub const GET_TEMPLATE: &str = "get_template";
pub const GET_AVAILABLE_TIME: &str = "get_available_time";
pub const CREATE_APPOINTMENT: &str = "create_appointment";
pub const SEND_OTP: &str = "send_otp";

/// Thin client for the Bull36 booking API.
///
/// Every call is a GET carrying the account's `token` and `user_id` as query
/// parameters. Responses are returned as raw JSON; interpreting the `success`
/// flag is left to the caller.
pub struct Bull36Client {
    client: Client,
    base_url: String,
}

impl Bull36Client {
    pub fn new(config: &AppConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn request(
        &self,
        endpoint: &str,
        user: &ActiveUser,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Calling Bull36 {} as '{}'", url, user.key);

        let mut query: Vec<(&str, &str)> = vec![
            ("token", user.token.as_str()),
            ("user_id", user.user_id.as_str()),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self.client.get(&url).query(&query).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Bull36 sometimes pairs an error status with a normal `success: 0` body;
            // hand those back so the caller can surface the upstream message.
            if let Ok(json) = serde_json::from_str::<Value>(&body) {
                if json.get("success").is_some() {
                    debug!("Bull36 {} answered {} with a structured body", endpoint, status);
                    return Ok(json);
                }
            }

            error!("Bull36 error ({}) from {}: {}", status, endpoint, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_template(&self, user: &ActiveUser) -> Result<Value, UpstreamError> {
        self.request(GET_TEMPLATE, user, &[]).await
    }

    pub async fn get_available_time(
        &self,
        user: &ActiveUser,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        self.request(GET_AVAILABLE_TIME, user, params).await
    }

    pub async fn create_appointment(
        &self,
        user: &ActiveUser,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        self.request(CREATE_APPOINTMENT, user, params).await
    }

    pub async fn send_otp(&self, user: &ActiveUser, phone: &str) -> Result<Value, UpstreamError> {
        self.request(SEND_OTP, user, &[("phone", phone.to_string())]).await
    }
}
