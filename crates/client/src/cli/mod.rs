//! CLI command definitions.

pub mod resource;

use clap::{Parser, Subcommand, ValueEnum};

pub use resource::{Action, ResourceCommand};

/// CLI client for the trialdesk API.
#[derive(Debug, Parser)]
#[command(name = "trialdesk-client")]
#[command(about = "CLI client for the trialdesk API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "TRIALDESK_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands, one per collection.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clinical trials.
    Trials(ResourceCommand),
    /// Trial sites.
    Sites(ResourceCommand),
    /// Enrolled patients.
    Patients(ResourceCommand),
    /// Trial documents.
    Documents(ResourceCommand),
    /// Adverse event reports.
    AdverseEvents(ResourceCommand),
    /// Regulatory approvals.
    RegulatoryApprovals(ResourceCommand),
    /// Audit trail entries.
    AuditLogs(ResourceCommand),
    /// Users.
    Users(ResourceCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_parse_list_with_filters_and_page() {
        let cli = Cli::try_parse_from([
            "trialdesk-client",
            "--format",
            "json",
            "trials",
            "list",
            "--filter",
            "status=recruiting",
            "--filter",
            "phase=phase3",
            "--page",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::Trials(ResourceCommand {
            action: Action::List {
                filters,
                page,
                limit,
            },
        }) = cli.command
        else {
            panic!("expected trials list");
        };
        assert_eq!(filters.len(), 2);
        assert_eq!(page, Some(2));
        assert_eq!(limit, None);
    }

    #[test]
    fn test_kebab_case_collections() {
        let id = Uuid::new_v4().to_string();
        let cli = Cli::try_parse_from([
            "trialdesk-client",
            "adverse-events",
            "update",
            id.as_str(),
            "--data",
            r#"{"resolved":true}"#,
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::AdverseEvents(ResourceCommand {
                action: Action::Update { .. }
            })
        ));
        assert_eq!(cli.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_rejects_bad_id() {
        assert!(Cli::try_parse_from(["trialdesk-client", "sites", "get", "not-a-uuid"]).is_err());
    }
}
