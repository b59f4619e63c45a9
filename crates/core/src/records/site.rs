use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{optional_text, require_text, MAX_SHORT_TEXT};
use super::{Entity, Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    #[default]
    Pending,
    Active,
    Closed,
}

/// An investigational site participating in a trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub trial_id: Uuid,
    pub name: String,
    pub city: String,
    pub country: String,
    pub principal_investigator: String,
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSite {
    pub trial_id: Uuid,
    pub name: String,
    pub city: String,
    pub country: String,
    pub principal_investigator: String,
    #[serde(default)]
    pub status: SiteStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SitePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_investigator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SiteStatus>,
}

impl Validate for NewSite {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, MAX_SHORT_TEXT)?;
        require_text("city", &self.city, MAX_SHORT_TEXT)?;
        require_text("country", &self.country, MAX_SHORT_TEXT)?;
        require_text(
            "principal_investigator",
            &self.principal_investigator,
            MAX_SHORT_TEXT,
        )
    }
}

impl Validate for SitePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("name", self.name.as_deref(), MAX_SHORT_TEXT)?;
        optional_text("city", self.city.as_deref(), MAX_SHORT_TEXT)?;
        optional_text("country", self.country.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "principal_investigator",
            self.principal_investigator.as_deref(),
            MAX_SHORT_TEXT,
        )
    }
}

impl Entity for Site {
    type Create = NewSite;
    type Patch = SitePatch;

    const ENTITY_TYPE: &'static str = "Site";
    const COLLECTION: &'static str = "sites";
    const ROUTE: &'static str = "sites";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewSite, now: DateTime<Utc>) -> Self {
        Self {
            id,
            trial_id: input.trial_id,
            name: input.name,
            city: input.city,
            country: input.country,
            principal_investigator: input.principal_investigator,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: SitePatch, now: DateTime<Utc>) {
        if let Some(trial_id) = patch.trial_id {
            self.trial_id = trial_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(country) = patch.country {
            self.country = country;
        }
        if let Some(pi) = patch.principal_investigator {
            self.principal_investigator = pi;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now;
    }

    fn label(&self) -> String {
        format!("{} ({}, {})", self.name, self.city, self.country)
    }
}
