use serde::Deserialize;
use serde_json::Value;

use shared_utils::decode::text_id;

pub const DEFAULT_DATA_TIME: &str = "5";
pub const DEFAULT_TEMPLATE_ID: &str = "1";

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub data_time: Option<String>,
    pub template_id: Option<String>,
    pub branch: Option<String>,
    pub appointment_type: Option<String>,
    pub date: Option<String>,
}

impl AvailabilityQuery {
    /// Upstream parameters with defaults applied; absent optional filters are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (
                "data_time",
                non_empty(&self.data_time).unwrap_or_else(|| DEFAULT_DATA_TIME.to_string()),
            ),
            (
                "template_id",
                non_empty(&self.template_id).unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string()),
            ),
        ];

        for (name, value) in [
            ("branch", &self.branch),
            ("appointment_type", &self.appointment_type),
            ("date", &self.date),
        ] {
            if let Some(value) = non_empty(value) {
                params.push((name, value));
            }
        }

        params
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Booking form as posted by the browser. Ids may be numbers or strings.
#[derive(Debug, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    pub branch: Option<Value>,
    pub cust_id: Option<Value>,
    pub start_time: Option<Value>,
    pub end_time: Option<Value>,
    pub date: Option<Value>,
    pub appointments_type_id: Option<Value>,
    pub payment_type: Option<Value>,
    pub payment_amount: Option<Value>,
    pub payment_ref: Option<Value>,
    pub deposit: Option<Value>,
}

impl CreateAppointmentRequest {
    /// Builds the upstream query, or lists the required fields that are missing.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, Vec<&'static str>> {
        let required = [
            ("branch", &self.branch),
            ("cust_id", &self.cust_id),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("date", &self.date),
            ("appointments_type_id", &self.appointments_type_id),
        ];
        let optional = [
            ("payment_type", &self.payment_type),
            ("payment_amount", &self.payment_amount),
            ("payment_ref", &self.payment_ref),
            ("deposit", &self.deposit),
        ];

        let mut params = Vec::new();
        let mut missing = Vec::new();

        for (name, value) in required {
            match value.as_ref().and_then(text_id) {
                Some(text) => params.push((name, text)),
                None => missing.push(name),
            }
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        params.extend(optional.into_iter().filter_map(|(name, value)| {
            value.as_ref().and_then(text_id).map(|text| (name, text))
        }));

        Ok(params)
    }
}
