use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_models::UpstreamError;
use shared_utils::decode::{
    decode_embedded, embedded_or_default, optional_number, optional_text, text_list,
};

// ==============================================================================
// BULL36 TEMPLATE PAYLOAD
// ==============================================================================

/// The `data` object of a `get_template` reply.
#[derive(Debug, Default, Deserialize)]
pub struct Template {
    #[serde(default, deserialize_with = "embedded_or_default")]
    pub doctor: Vec<TemplateDoctor>,
    #[serde(default, deserialize_with = "embedded_or_default")]
    pub appointments_type: Vec<TemplateTreatment>,
    #[serde(default, deserialize_with = "embedded_or_default")]
    pub branch: Vec<TemplateBranch>,
}

impl Template {
    pub fn from_body(body: &Value) -> Self {
        body.get("data")
            .map(decode_embedded::<Template>)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateDoctor {
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub name_en: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub branch_id: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub working_day: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateTreatment {
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub doctor_id: Vec<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub image: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateBranch {
    #[serde(default, deserialize_with = "optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub open_time: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub close_time: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub lng: Option<f64>,
}

// ==============================================================================
// PUBLIC SHAPES
// ==============================================================================

pub const DEFAULT_SPECIALTY: &str = "General";
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub specialty: String,
    pub image: String,
    pub description: String,
    pub branch_id: Option<String>,
    pub working_days: Vec<String>,
}

impl From<TemplateDoctor> for Doctor {
    fn from(row: TemplateDoctor) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            name_en: row.name_en.unwrap_or_default(),
            specialty: row.position.unwrap_or_else(|| DEFAULT_SPECIALTY.to_string()),
            image: row.image.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            branch_id: row.branch_id,
            working_days: row.working_day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Minutes.
    pub duration: u32,
    pub description: String,
    pub doctor_ids: Vec<String>,
    pub images: Vec<String>,
}

impl From<TemplateTreatment> for Treatment {
    fn from(row: TemplateTreatment) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            price: row.price.unwrap_or(0.0),
            duration: row
                .duration
                .filter(|d| *d > 0.0)
                .map(|d| d.round() as u32)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
            description: row.description.unwrap_or_default(),
            doctor_ids: row.doctor_id,
            images: row.image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub open_time: String,
    pub close_time: String,
    pub image: String,
    pub location: Location,
}

impl From<TemplateBranch> for Clinic {
    fn from(row: TemplateBranch) -> Self {
        Self {
            id: row.id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            address: row.address.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            open_time: row.open_time.unwrap_or_default(),
            close_time: row.close_time.unwrap_or_default(),
            image: row.image.unwrap_or_default(),
            location: Location {
                lat: row.lat,
                lng: row.lng,
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Rejected(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Treatment not found")]
    TreatmentNotFound,
}
