use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    optional_text, require_date_order, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT,
};
use super::{Entity, Validate, ValidationError};

/// Clinical development phase of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    EarlyPhase1,
    Phase1,
    Phase1Phase2,
    Phase2,
    Phase2Phase3,
    Phase3,
    Phase4,
    NotApplicable,
}

/// Recruitment status of a trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    #[default]
    NotYetRecruiting,
    Recruiting,
    ActiveNotRecruiting,
    Suspended,
    Terminated,
    Completed,
    Withdrawn,
}

/// A clinical trial (study protocol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub id: Uuid,
    pub title: String,
    /// Sponsor-assigned protocol number.
    pub protocol_number: String,
    pub phase: TrialPhase,
    pub status: TrialStatus,
    pub sponsor: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTrial {
    pub title: String,
    pub protocol_number: String,
    pub phase: TrialPhase,
    #[serde(default)]
    pub status: TrialStatus,
    pub sponsor: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl NewTrial {
    pub fn new(
        title: impl Into<String>,
        protocol_number: impl Into<String>,
        phase: TrialPhase,
        sponsor: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            protocol_number: protocol_number.into(),
            phase,
            status: TrialStatus::default(),
            sponsor: sponsor.into(),
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Partial update for a trial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrialPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<TrialPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TrialStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<NaiveDate>>,
}

impl Validate for NewTrial {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title, MAX_SHORT_TEXT)?;
        require_text("protocol_number", &self.protocol_number, MAX_SHORT_TEXT)?;
        require_text("sponsor", &self.sponsor, MAX_SHORT_TEXT)?;
        optional_text("description", self.description.as_deref(), MAX_LONG_TEXT)?;
        require_date_order("start_date", self.start_date, "end_date", self.end_date)
    }
}

impl Validate for TrialPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "protocol_number",
            self.protocol_number.as_deref(),
            MAX_SHORT_TEXT,
        )?;
        optional_text("sponsor", self.sponsor.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "description",
            self.description.as_ref().and_then(Option::as_deref),
            MAX_LONG_TEXT,
        )?;
        require_date_order(
            "start_date",
            self.start_date.flatten(),
            "end_date",
            self.end_date.flatten(),
        )
    }
}

impl Entity for Trial {
    type Create = NewTrial;
    type Patch = TrialPatch;

    const ENTITY_TYPE: &'static str = "Trial";
    const COLLECTION: &'static str = "trials";
    const ROUTE: &'static str = "trials";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewTrial, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            protocol_number: input.protocol_number,
            phase: input.phase,
            status: input.status,
            sponsor: input.sponsor,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: TrialPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(protocol_number) = patch.protocol_number {
            self.protocol_number = protocol_number;
        }
        if let Some(phase) = patch.phase {
            self.phase = phase;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(sponsor) = patch.sponsor {
            self.sponsor = sponsor;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        self.updated_at = now;
    }

    fn validate_record(&self) -> Result<(), ValidationError> {
        require_date_order("start_date", self.start_date, "end_date", self.end_date)
    }

    fn label(&self) -> String {
        format!("{} [{}]", self.title, self.protocol_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_trial() -> NewTrial {
        NewTrial::new("Trial A", "PROTO-001", TrialPhase::Phase2, "Acme Pharma")
    }

    #[test]
    fn test_from_create_sets_identity_and_timestamps() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let trial = Trial::from_create(id, new_trial(), now);

        assert_eq!(trial.id, id);
        assert_eq!(trial.title, "Trial A");
        assert_eq!(trial.status, TrialStatus::NotYetRecruiting);
        assert_eq!(trial.created_at, now);
        assert_eq!(trial.updated_at, now);
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let created = Utc::now();
        let mut trial = Trial::from_create(Uuid::new_v4(), new_trial(), created);
        let later = created + chrono::Duration::seconds(5);

        trial.apply_patch(
            TrialPatch {
                status: Some(TrialStatus::Recruiting),
                ..Default::default()
            },
            later,
        );

        assert_eq!(trial.status, TrialStatus::Recruiting);
        assert_eq!(trial.title, "Trial A");
        assert_eq!(trial.created_at, created);
        assert_eq!(trial.updated_at, later);
    }

    #[test]
    fn test_validate_rejects_inverted_dates() {
        let mut input = new_trial();
        input.start_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        input.end_date = NaiveDate::from_ymd_opt(2024, 3, 1);

        assert!(matches!(
            input.validate(),
            Err(ValidationError::DateOrder { .. })
        ));
    }

    #[test]
    fn test_patch_can_clear_nullable_fields() {
        let mut input = new_trial();
        input.description = Some("Double-blind".to_string());
        let mut trial = Trial::from_create(Uuid::new_v4(), input, Utc::now());

        let patch: TrialPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        trial.apply_patch(patch, Utc::now());
        assert!(trial.description.is_none());

        let patch: TrialPatch = serde_json::from_str(r#"{"title":"Trial B"}"#).unwrap();
        assert!(patch.description.is_none());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_patched_record_is_checked_as_a_whole() {
        let mut input = new_trial();
        input.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let mut trial = Trial::from_create(Uuid::new_v4(), input, Utc::now());

        let patch = TrialPatch {
            end_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1)),
            ..Default::default()
        };
        // The patch alone is consistent; merged with the stored start it is not.
        assert!(patch.validate().is_ok());
        trial.apply_patch(patch, Utc::now());
        assert_eq!(
            trial.validate_record(),
            Err(ValidationError::DateOrder {
                earlier: "start_date",
                later: "end_date"
            })
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<TrialPatch>(r#"{"titel":"B"}"#).is_err());
        assert!(serde_json::from_str::<NewTrial>(
            r#"{"title":"T","protocol_number":"P","phase":"phase3","sponsor":"S","sponser":"x"}"#
        )
        .is_err());
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut input = new_trial();
        input.title = " ".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Empty { field: "title" })
        );
    }

    #[test]
    fn test_phase_wire_format() {
        assert_eq!(
            serde_json::to_string(&TrialPhase::Phase1Phase2).unwrap(),
            r#""phase1_phase2""#
        );
        let status: TrialStatus = serde_json::from_str(r#""active_not_recruiting""#).unwrap();
        assert_eq!(status, TrialStatus::ActiveNotRecruiting);
    }

    #[test]
    fn test_create_input_defaults_status() {
        let input: NewTrial = serde_json::from_str(
            r#"{"title":"T","protocol_number":"P","phase":"phase3","sponsor":"S"}"#,
        )
        .unwrap();
        assert_eq!(input.status, TrialStatus::NotYetRecruiting);
        assert!(input.description.is_none());
    }
}
