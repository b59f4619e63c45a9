use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{optional_text, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT};
use super::{Entity, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Protocol,
    InformedConsent,
    InvestigatorBrochure,
    CaseReportForm,
    Report,
    Other,
}

/// A versioned trial document. Only metadata is stored; the file itself lives
/// wherever `storage_url` points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub trial_id: Uuid,
    pub title: String,
    pub kind: DocumentKind,
    pub version: String,
    pub storage_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDocument {
    pub trial_id: Uuid,
    pub title: String,
    pub kind: DocumentKind,
    pub version: String,
    #[serde(default)]
    pub storage_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_url: Option<Option<String>>,
}

impl Validate for NewDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title, MAX_SHORT_TEXT)?;
        require_text("version", &self.version, MAX_SHORT_TEXT)?;
        optional_text(
            "storage_url",
            self.storage_url.as_deref(),
            MAX_LONG_TEXT,
        )
    }
}

impl Validate for DocumentPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("title", self.title.as_deref(), MAX_SHORT_TEXT)?;
        optional_text("version", self.version.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "storage_url",
            self.storage_url.as_ref().and_then(Option::as_deref),
            MAX_LONG_TEXT,
        )
    }
}

impl Entity for Document {
    type Create = NewDocument;
    type Patch = DocumentPatch;

    const ENTITY_TYPE: &'static str = "Document";
    const COLLECTION: &'static str = "documents";
    const ROUTE: &'static str = "documents";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewDocument, now: DateTime<Utc>) -> Self {
        Self {
            id,
            trial_id: input.trial_id,
            title: input.title,
            kind: input.kind,
            version: input.version,
            storage_url: input.storage_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: DocumentPatch, now: DateTime<Utc>) {
        if let Some(trial_id) = patch.trial_id {
            self.trial_id = trial_id;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(version) = patch.version {
            self.version = version;
        }
        if let Some(storage_url) = patch.storage_url {
            self.storage_url = storage_url;
        }
        self.updated_at = now;
    }

    fn label(&self) -> String {
        format!("{} v{}", self.title, self.version)
    }
}
