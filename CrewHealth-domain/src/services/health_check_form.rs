//! Controller for the daily health-check form.
//!
//! Holds the raw form state for one crew member, re-evaluates it on demand,
//! persists drafts through an injected `DraftStore` and gates submission on
//! a clean validation result.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::entities::health_record::CreateHealthRecordRequest;
use crate::entities::selection::Symptom;
use crate::entities::vitals::{
    AssessmentSummary, TemperatureUnit, ValidationResult, VitalField, VitalsForm,
};
use crate::services::debounce::Debouncer;
use crate::services::drafts::{DraftError, DraftService, HealthCheckDraft};
use crate::services::health_records::health_check_request;
use crate::services::vitals;
use crew_health_data::repository::DraftStore;

/// Health-check form errors
#[derive(Debug, Error)]
pub enum FormError {
    /// Submission blocked by field failures
    #[error("Health check has invalid fields: {0}")]
    Validation(ValidationResult),

    /// Draft could not be read or written
    #[error(transparent)]
    Draft(#[from] DraftError),
}

pub struct HealthCheckForm {
    crew_id: String,
    form: VitalsForm,
    unit: TemperatureUnit,
    drafts: DraftService,
}

impl HealthCheckForm {
    /// Fresh form in Celsius; any saved draft is left untouched until `restore_draft`
    pub fn open(crew_id: impl Into<String>, store: Arc<dyn DraftStore>) -> Self {
        Self {
            crew_id: crew_id.into(),
            form: VitalsForm::default(),
            unit: TemperatureUnit::Celsius,
            drafts: DraftService::new(store),
        }
    }

    pub fn crew_id(&self) -> &str {
        &self.crew_id
    }

    pub fn form(&self) -> &VitalsForm {
        &self.form
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Load the saved draft, if any. A corrupt snapshot is logged and skipped.
    pub fn restore_draft(&mut self) -> Result<bool, FormError> {
        match self.drafts.load(&self.crew_id) {
            Ok(Some(draft)) => {
                debug!("Restored health-check draft for {} saved at {:?}", self.crew_id, draft.saved_at);
                self.form = draft.form;
                self.unit = draft.unit;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(DraftError::Encoding(e)) => {
                warn!("Ignoring unreadable health-check draft for {}: {}", self.crew_id, e);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_field(&mut self, field: VitalField, text: impl Into<String>) {
        self.form.set(field, text);
    }

    /// Returns whether the symptom is selected afterwards
    pub fn toggle_symptom(&mut self, symptom: Symptom) -> bool {
        self.form.symptoms.toggle(symptom)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.form.notes = notes.into();
    }

    /// Change the active unit, converting the entered temperature when it parses
    pub fn switch_unit(&mut self, unit: TemperatureUnit) {
        if unit == self.unit {
            return;
        }

        if let Some(value) = self.form.parsed(VitalField::Temperature).number() {
            let converted = vitals::convert_temperature(value, self.unit, unit);
            self.form.set(VitalField::Temperature, format!("{:.1}", converted));
        }
        self.unit = unit;
    }

    pub fn validation(&self) -> ValidationResult {
        vitals::validate(&self.form, self.unit)
    }

    pub fn summary(&self) -> AssessmentSummary {
        vitals::assess(&self.form.reading(self.unit))
    }

    pub fn save_draft(&self) -> Result<HealthCheckDraft, FormError> {
        Ok(self.drafts.save(&self.crew_id, &self.form, self.unit)?)
    }

    /// Reset to a fresh form and drop the saved draft
    pub fn discard(&mut self) -> Result<(), FormError> {
        self.form = VitalsForm::default();
        self.unit = TemperatureUnit::Celsius;
        self.drafts.remove(&self.crew_id)?;
        info!("Discarded health-check form for {}", self.crew_id);
        Ok(())
    }

    /// Build the record request for the current form and clear the draft.
    ///
    /// Nothing is written when validation fails. The form itself is kept so a
    /// failed persist can be retried.
    pub fn submit(&mut self, recorded_at: impl Into<String>) -> Result<CreateHealthRecordRequest, FormError> {
        let request = health_check_request(&self.crew_id, &self.form, self.unit, recorded_at.into())
            .map_err(FormError::Validation)?;

        if let Err(e) = self.drafts.remove(&self.crew_id) {
            warn!("Could not clear health-check draft for {}: {}", self.crew_id, e);
        }

        info!("Health check ready for submission for {}", self.crew_id);
        Ok(request)
    }

    /// Re-validate after the debouncer's quiet period and send the result
    pub fn schedule_validation(&self, debouncer: &Debouncer, results: &UnboundedSender<ValidationResult>) {
        let form = self.form.clone();
        let unit = self.unit;
        let results = results.clone();

        debouncer.schedule(move || {
            // Receiver gone means nobody is listening anymore.
            let _ = results.send(vitals::validate(&form, unit));
        });
    }
}
