//! Record types for every collection the service manages.
//!
//! Each record implements [`Entity`], which ties it to a create input, a
//! patch input and its collection name.

mod adverse_event;
mod audit_log;
mod document;
mod entity;
mod patient;
mod regulatory_approval;
mod site;
mod trial;
mod user;
mod validation;

pub use adverse_event::{AdverseEvent, AdverseEventPatch, Causality, NewAdverseEvent, Severity};
pub use audit_log::{AuditAction, AuditLog, AuditLogPatch, NewAuditLog};
pub use document::{Document, DocumentKind, DocumentPatch, NewDocument};
pub use entity::Entity;
pub use patient::{NewPatient, Patient, PatientPatch, PatientStatus, Sex};
pub use regulatory_approval::{
    ApprovalStatus, NewRegulatoryApproval, RegulatoryApproval, RegulatoryApprovalPatch,
};
pub use site::{NewSite, Site, SitePatch, SiteStatus};
pub use trial::{NewTrial, Trial, TrialPatch, TrialPhase, TrialStatus};
pub use user::{NewUser, User, UserPatch, UserRole};
pub use validation::{
    optional_text, require_date_order, require_email, require_text, Validate, ValidationError,
    MAX_LONG_TEXT, MAX_SHORT_TEXT,
};
