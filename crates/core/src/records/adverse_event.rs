use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    optional_text, require_date_order, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT,
};
use super::{Entity, Validate, ValidationError};

/// Severity grade of an adverse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    LifeThreatening,
    Fatal,
}

/// Investigator's assessment of the relationship to the study intervention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Causality {
    Related,
    ProbablyRelated,
    PossiblyRelated,
    UnlikelyRelated,
    NotRelated,
    #[default]
    Unknown,
}

/// An adverse event observed in a trial participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdverseEvent {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub trial_id: Uuid,
    /// Reported term, e.g. "Headache".
    pub term: String,
    pub description: Option<String>,
    pub severity: Severity,
    /// Serious adverse event (SAE) flag.
    pub serious: bool,
    pub causality: Causality,
    pub onset_date: NaiveDate,
    pub resolved_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAdverseEvent {
    pub patient_id: Uuid,
    pub trial_id: Uuid,
    pub term: String,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: Severity,
    #[serde(default)]
    pub serious: bool,
    #[serde(default)]
    pub causality: Causality,
    pub onset_date: NaiveDate,
    #[serde(default)]
    pub resolved_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdverseEventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serious: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub causality: Option<Causality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_on: Option<Option<NaiveDate>>,
}

impl Validate for NewAdverseEvent {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("term", &self.term, MAX_SHORT_TEXT)?;
        optional_text("description", self.description.as_deref(), MAX_LONG_TEXT)?;
        require_date_order(
            "onset_date",
            Some(self.onset_date),
            "resolved_on",
            self.resolved_on,
        )
    }
}

impl Validate for AdverseEventPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("term", self.term.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "description",
            self.description.as_ref().and_then(Option::as_deref),
            MAX_LONG_TEXT,
        )?;
        require_date_order(
            "onset_date",
            self.onset_date,
            "resolved_on",
            self.resolved_on.flatten(),
        )
    }
}

impl Entity for AdverseEvent {
    type Create = NewAdverseEvent;
    type Patch = AdverseEventPatch;

    const ENTITY_TYPE: &'static str = "AdverseEvent";
    const COLLECTION: &'static str = "adverse_events";
    const ROUTE: &'static str = "adverse-events";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewAdverseEvent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_id: input.patient_id,
            trial_id: input.trial_id,
            term: input.term,
            description: input.description,
            severity: input.severity,
            serious: input.serious,
            causality: input.causality,
            onset_date: input.onset_date,
            resolved_on: input.resolved_on,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: AdverseEventPatch, now: DateTime<Utc>) {
        if let Some(patient_id) = patch.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(trial_id) = patch.trial_id {
            self.trial_id = trial_id;
        }
        if let Some(term) = patch.term {
            self.term = term;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(serious) = patch.serious {
            self.serious = serious;
        }
        if let Some(causality) = patch.causality {
            self.causality = causality;
        }
        if let Some(onset_date) = patch.onset_date {
            self.onset_date = onset_date;
        }
        if let Some(resolved_on) = patch.resolved_on {
            self.resolved_on = resolved_on;
        }
        self.updated_at = now;
    }

    fn validate_record(&self) -> Result<(), ValidationError> {
        require_date_order(
            "onset_date",
            Some(self.onset_date),
            "resolved_on",
            self.resolved_on,
        )
    }

    fn label(&self) -> String {
        let sae = if self.serious { " (SAE)" } else { "" };
        format!("{}{} on {}", self.term, sae, self.onset_date)
    }
}
