use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SwitchUserRequest {
    #[serde(rename = "userKey")]
    pub user_key: Option<String>,
}
