//! Demo records loaded at startup when `SEED_DEMO_DATA` is set.
//!
//! Everything goes through the repositories, so a cached state stays
//! consistent with what was seeded.

use chrono::NaiveDate;

use trialdesk_core::records::{
    ApprovalStatus, Causality, DocumentKind, NewAdverseEvent, NewDocument, NewPatient,
    NewRegulatoryApproval, NewSite, NewTrial, NewUser, PatientStatus, Severity, Sex, SiteStatus,
    TrialPhase, TrialStatus, UserRole,
};

use crate::state::AppState;

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| anyhow::anyhow!("invalid demo date {y}-{m}-{d}"))
}

/// Seeds one trial with its sites, patients, protocol, approval, an adverse
/// event and an admin user.
pub async fn seed_demo_data(state: &AppState) -> anyhow::Result<()> {
    state
        .users
        .create(NewUser::new(
            "Dana Whitfield",
            "dana.whitfield@trialdesk.dev",
            UserRole::Admin,
        ))
        .await?;

    let mut trial = NewTrial::new(
        "CARDIO-7: Low-dose colchicine after myocardial infarction",
        "CARDIO-7-2025",
        TrialPhase::Phase3,
        "Northbridge Therapeutics",
    );
    trial.status = TrialStatus::Recruiting;
    trial.description = Some("Randomized, double-blind, placebo-controlled".to_string());
    trial.start_date = Some(date(2025, 2, 1)?);
    let trial = state.trials.create(trial).await?;

    let boston = state
        .sites
        .create(NewSite {
            trial_id: trial.id,
            name: "Harbor General Hospital".to_string(),
            city: "Boston".to_string(),
            country: "US".to_string(),
            principal_investigator: "Dr. Amara Osei".to_string(),
            status: SiteStatus::Active,
        })
        .await?;

    state
        .sites
        .create(NewSite {
            trial_id: trial.id,
            name: "Klinikum Nord".to_string(),
            city: "Hamburg".to_string(),
            country: "DE".to_string(),
            principal_investigator: "Dr. Lukas Brandt".to_string(),
            status: SiteStatus::Pending,
        })
        .await?;

    let first_patient = state
        .patients
        .create(NewPatient {
            site_id: boston.id,
            subject_code: "HGH-001".to_string(),
            date_of_birth: Some(date(1961, 4, 12)?),
            sex: Some(Sex::Female),
            status: PatientStatus::Enrolled,
            enrolled_on: Some(date(2025, 3, 3)?),
        })
        .await?;

    state
        .patients
        .create(NewPatient {
            site_id: boston.id,
            subject_code: "HGH-002".to_string(),
            date_of_birth: Some(date(1958, 11, 30)?),
            sex: Some(Sex::Male),
            status: PatientStatus::Screening,
            enrolled_on: None,
        })
        .await?;

    state
        .documents
        .create(NewDocument {
            trial_id: trial.id,
            title: "Clinical study protocol".to_string(),
            kind: DocumentKind::Protocol,
            version: "2.1".to_string(),
            storage_url: None,
        })
        .await?;

    state
        .regulatory_approvals
        .create(NewRegulatoryApproval {
            trial_id: trial.id,
            authority: "FDA".to_string(),
            reference_number: "IND-158233".to_string(),
            status: ApprovalStatus::Approved,
            submitted_on: date(2024, 10, 14)?,
            decided_on: Some(date(2024, 12, 20)?),
            expires_on: None,
        })
        .await?;

    state
        .adverse_events
        .create(NewAdverseEvent {
            patient_id: first_patient.id,
            trial_id: trial.id,
            term: "Diarrhoea".to_string(),
            description: Some("Onset two days after first dose".to_string()),
            severity: Severity::Mild,
            serious: false,
            causality: Causality::PossiblyRelated,
            onset_date: date(2025, 3, 5)?,
            resolved_on: Some(date(2025, 3, 9)?),
        })
        .await?;

    tracing::info!(trial_id = %trial.id, "Seeded demo data");
    Ok(())
}
