use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{optional_text, require_date_order, require_text, MAX_SHORT_TEXT};
use super::{Entity, Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Expired,
}

/// A submission to a regulatory authority or ethics committee for a trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryApproval {
    pub id: Uuid,
    pub trial_id: Uuid,
    /// Authority name, e.g. "FDA" or "EMA".
    pub authority: String,
    pub reference_number: String,
    pub status: ApprovalStatus,
    pub submitted_on: NaiveDate,
    pub decided_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRegulatoryApproval {
    pub trial_id: Uuid,
    pub authority: String,
    pub reference_number: String,
    #[serde(default)]
    pub status: ApprovalStatus,
    pub submitted_on: NaiveDate,
    #[serde(default)]
    pub decided_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegulatoryApprovalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_on: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub decided_on: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_on: Option<Option<NaiveDate>>,
}

impl Validate for NewRegulatoryApproval {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("authority", &self.authority, MAX_SHORT_TEXT)?;
        require_text("reference_number", &self.reference_number, MAX_SHORT_TEXT)?;
        require_date_order("decided_on", self.decided_on, "expires_on", self.expires_on)
    }
}

impl Validate for RegulatoryApprovalPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("authority", self.authority.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "reference_number",
            self.reference_number.as_deref(),
            MAX_SHORT_TEXT,
        )?;
        require_date_order(
            "decided_on",
            self.decided_on.flatten(),
            "expires_on",
            self.expires_on.flatten(),
        )
    }
}

impl Entity for RegulatoryApproval {
    type Create = NewRegulatoryApproval;
    type Patch = RegulatoryApprovalPatch;

    const ENTITY_TYPE: &'static str = "RegulatoryApproval";
    const COLLECTION: &'static str = "regulatory_approvals";
    const ROUTE: &'static str = "regulatory-approvals";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewRegulatoryApproval, now: DateTime<Utc>) -> Self {
        Self {
            id,
            trial_id: input.trial_id,
            authority: input.authority,
            reference_number: input.reference_number,
            status: input.status,
            submitted_on: input.submitted_on,
            decided_on: input.decided_on,
            expires_on: input.expires_on,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: RegulatoryApprovalPatch, now: DateTime<Utc>) {
        if let Some(trial_id) = patch.trial_id {
            self.trial_id = trial_id;
        }
        if let Some(authority) = patch.authority {
            self.authority = authority;
        }
        if let Some(reference_number) = patch.reference_number {
            self.reference_number = reference_number;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(submitted_on) = patch.submitted_on {
            self.submitted_on = submitted_on;
        }
        if let Some(decided_on) = patch.decided_on {
            self.decided_on = decided_on;
        }
        if let Some(expires_on) = patch.expires_on {
            self.expires_on = expires_on;
        }
        self.updated_at = now;
    }

    fn validate_record(&self) -> Result<(), ValidationError> {
        require_date_order("decided_on", self.decided_on, "expires_on", self.expires_on)
    }

    fn label(&self) -> String {
        format!("{} {}", self.authority, self.reference_number)
    }
}
