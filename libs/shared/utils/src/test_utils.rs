use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::{AppConfig, UserCredentials};

pub const TEST_DEFAULT_USER: &str = "default";
pub const TEST_SECOND_USER: &str = "clinic_b";
pub const TEST_DEFAULT_TOKEN: &str = "token-default";
pub const TEST_SECOND_TOKEN: &str = "token-clinic-b";

pub struct TestConfig {
    pub base_url: String,
    pub users: Vec<(String, String, String)>,
    pub template_cache_ttl_secs: u64,
    pub otp_ttl_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9".to_string(),
            users: vec![
                (TEST_DEFAULT_USER.to_string(), TEST_DEFAULT_TOKEN.to_string(), "101".to_string()),
                (TEST_SECOND_USER.to_string(), TEST_SECOND_TOKEN.to_string(), "202".to_string()),
            ],
            template_cache_ttl_secs: 0,
            otp_ttl_secs: 300,
        }
    }
}

impl TestConfig {
    /// Points the config at a mock upstream, usually `MockServer::uri()`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        let users: BTreeMap<String, UserCredentials> = self
            .users
            .iter()
            .map(|(key, token, user_id)| {
                (
                    key.clone(),
                    UserCredentials {
                        token: token.clone(),
                        user_id: user_id.clone(),
                    },
                )
            })
            .collect();

        AppConfig {
            base_url: self.base_url.clone(),
            users,
            default_user: TEST_DEFAULT_USER.to_string(),
            upstream_timeout_secs: 5,
            template_cache_ttl_secs: self.template_cache_ttl_secs,
            otp_ttl_secs: self.otp_ttl_secs,
            otp_hash_secret: Some("test-otp-secret".to_string()),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned Bull36 payloads shared by the cell tests.
pub struct MockBull36Responses;

impl MockBull36Responses {
    pub fn template() -> Value {
        json!({
            "success": 1,
            "message": "ok",
            "data": {
                "doctor": [
                    {
                        "id": 1,
                        "name": "พญ. สมหญิง ใจดี",
                        "name_en": "Dr. Somying Jaidee",
                        "position": "Dermatologist",
                        "image": "https://cdn.example.com/doctors/1.jpg",
                        "description": "Skin and laser specialist",
                        "branch_id": 10,
                        "working_day": "[\"mon\",\"wed\",\"fri\"]"
                    },
                    {
                        "id": "2",
                        "name": "Dr. Narin"
                    }
                ],
                "appointments_type": [
                    {
                        "id": 5,
                        "name": "Acne consultation",
                        "price": "1500",
                        "duration": 45,
                        "description": "First visit",
                        "doctor_id": "[1,2]",
                        "image": "[\"https://cdn.example.com/t/5a.jpg\"]"
                    },
                    {
                        "id": 6,
                        "name": "Follow-up"
                    }
                ],
                "branch": [
                    {
                        "id": 10,
                        "name": "Siam branch",
                        "address": "Rama I Rd",
                        "phone": "021234567",
                        "open_time": "10:00",
                        "close_time": "20:00",
                        "lat": "13.7456",
                        "lng": 100.5341
                    }
                ]
            }
        })
    }

    pub fn send_otp(otp: Value, cust_id: Option<&str>) -> Value {
        json!({
            "success": 1,
            "message": "OTP sent",
            "otp": otp,
            "cust_id": cust_id,
        })
    }

    pub fn failure(message: &str) -> Value {
        json!({
            "success": 0,
            "message": message,
        })
    }
}
