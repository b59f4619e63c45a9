use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{optional_text, require_text, MAX_SHORT_TEXT};
use super::{Entity, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    Other,
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    #[default]
    Screening,
    Enrolled,
    Withdrawn,
    Completed,
}

/// A trial participant, identified outside the system only by a subject code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub site_id: Uuid,
    pub subject_code: String,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub status: PatientStatus,
    pub enrolled_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPatient {
    pub site_id: Uuid,
    pub subject_code: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub status: PatientStatus,
    #[serde(default)]
    pub enrolled_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub sex: Option<Option<Sex>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PatientStatus>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub enrolled_on: Option<Option<NaiveDate>>,
}

impl Validate for NewPatient {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("subject_code", &self.subject_code, MAX_SHORT_TEXT)
    }
}

impl Validate for PatientPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("subject_code", self.subject_code.as_deref(), MAX_SHORT_TEXT)
    }
}

impl Entity for Patient {
    type Create = NewPatient;
    type Patch = PatientPatch;

    const ENTITY_TYPE: &'static str = "Patient";
    const COLLECTION: &'static str = "patients";
    const ROUTE: &'static str = "patients";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewPatient, now: DateTime<Utc>) -> Self {
        Self {
            id,
            site_id: input.site_id,
            subject_code: input.subject_code,
            date_of_birth: input.date_of_birth,
            sex: input.sex,
            status: input.status,
            enrolled_on: input.enrolled_on,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: PatientPatch, now: DateTime<Utc>) {
        if let Some(site_id) = patch.site_id {
            self.site_id = site_id;
        }
        if let Some(subject_code) = patch.subject_code {
            self.subject_code = subject_code;
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(sex) = patch.sex {
            self.sex = sex;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(enrolled_on) = patch.enrolled_on {
            self.enrolled_on = enrolled_on;
        }
        self.updated_at = now;
    }

    fn label(&self) -> String {
        self.subject_code.clone()
    }
}
