use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{optional_text, require_text, MAX_LONG_TEXT, MAX_SHORT_TEXT};
use super::{Entity, Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    View,
}

/// A record of an action taken on another entity.
///
/// Audit entries are written by clients like any other collection; nothing
/// records them automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAuditLog {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Uuid,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditLogPatch {
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<Option<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    #[serde(
        default,
        deserialize_with = "crate::serde::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<Option<String>>,
}

impl Validate for NewAuditLog {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("entity_type", &self.entity_type, MAX_SHORT_TEXT)?;
        optional_text(
            "details",
            self.details.as_deref(),
            MAX_LONG_TEXT,
        )
    }
}

impl Validate for AuditLogPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_text("entity_type", self.entity_type.as_deref(), MAX_SHORT_TEXT)?;
        optional_text(
            "details",
            self.details.as_ref().and_then(Option::as_deref),
            MAX_LONG_TEXT,
        )
    }
}

impl Entity for AuditLog {
    type Create = NewAuditLog;
    type Patch = AuditLogPatch;

    const ENTITY_TYPE: &'static str = "AuditLog";
    const COLLECTION: &'static str = "audit_logs";
    const ROUTE: &'static str = "audit-logs";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn from_create(id: Uuid, input: NewAuditLog, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: input.user_id,
            action: input.action,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            details: input.details,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: AuditLogPatch, now: DateTime<Utc>) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(action) = patch.action {
            self.action = action;
        }
        if let Some(entity_type) = patch.entity_type {
            self.entity_type = entity_type;
        }
        if let Some(entity_id) = patch.entity_id {
            self.entity_id = entity_id;
        }
        if let Some(details) = patch.details {
            self.details = details;
        }
        self.updated_at = now;
    }

    fn label(&self) -> String {
        let action = match self.action {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::View => "view",
        };
        format!("{} {} {}", action, self.entity_type, self.entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_entry_round_trips_through_json() {
        let entry = AuditLog::from_create(
            Uuid::new_v4(),
            NewAuditLog {
                user_id: None,
                action: AuditAction::Delete,
                entity_type: "Trial".to_string(),
                entity_id: Uuid::new_v4(),
                details: None,
            },
            Utc::now(),
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "delete");
        assert!(json["user_id"].is_null());
    }

    #[test]
    fn test_validate_requires_entity_type() {
        let input = NewAuditLog {
            user_id: None,
            action: AuditAction::View,
            entity_type: String::new(),
            entity_id: Uuid::new_v4(),
            details: None,
        };
        assert!(input.validate().is_err());
    }
}
