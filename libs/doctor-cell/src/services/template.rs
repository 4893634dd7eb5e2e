use serde_json::Value;
use tracing::{debug, warn};

use shared_models::{is_success_flag, upstream_message, UpstreamError};
use shared_upstream::{ActiveUser, AppState};

use crate::models::{Clinic, Doctor, Template, TemplateError, Treatment};

/// Doctors, treatments and clinics are all views over one Bull36 template
/// payload. This service owns fetching it (through the template cache) and
/// projecting it into each view.
pub struct TemplateService<'a> {
    state: &'a AppState,
}

impl<'a> TemplateService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Raw upstream reply, bypassing the cache.
    pub async fn fetch_raw(&self, user: &ActiveUser) -> Result<Value, UpstreamError> {
        self.state.bull36.get_template(user).await
    }

    pub async fn fetch(&self, user: &ActiveUser) -> Result<Template, TemplateError> {
        if let Some(body) = self.state.template_cache.get(&user.key).await {
            return Ok(Template::from_body(&body));
        }

        let body = self.fetch_raw(user).await?;
        if !is_success_flag(&body) {
            let message = upstream_message(&body, "Bull36 rejected the template request");
            warn!("Template fetch for '{}' rejected: {}", user.key, message);
            return Err(TemplateError::Rejected(message));
        }

        let template = Template::from_body(&body);
        debug!(
            "Fetched template for '{}': {} doctors, {} treatments, {} branches",
            user.key,
            template.doctor.len(),
            template.appointments_type.len(),
            template.branch.len()
        );

        self.state.template_cache.insert(&user.key, body).await;
        Ok(template)
    }

    pub async fn doctors(&self, user: &ActiveUser) -> Result<Vec<Doctor>, TemplateError> {
        let template = self.fetch(user).await?;
        Ok(template.doctor.into_iter().map(Doctor::from).collect())
    }

    pub async fn doctor(
        &self,
        user: &ActiveUser,
        doctor_id: &str,
    ) -> Result<Doctor, TemplateError> {
        self.doctors(user)
            .await?
            .into_iter()
            .find(|d| d.id == doctor_id)
            .ok_or(TemplateError::DoctorNotFound)
    }

    pub async fn treatments(&self, user: &ActiveUser) -> Result<Vec<Treatment>, TemplateError> {
        let template = self.fetch(user).await?;
        Ok(template.appointments_type.into_iter().map(Treatment::from).collect())
    }

    pub async fn treatment(
        &self,
        user: &ActiveUser,
        treatment_id: &str,
    ) -> Result<Treatment, TemplateError> {
        self.treatments(user)
            .await?
            .into_iter()
            .find(|t| t.id == treatment_id)
            .ok_or(TemplateError::TreatmentNotFound)
    }

    pub async fn clinics(&self, user: &ActiveUser) -> Result<Vec<Clinic>, TemplateError> {
        let template = self.fetch(user).await?;
        Ok(template.branch.into_iter().map(Clinic::from).collect())
    }
}
