//! trialdesk-client CLI entry point.

use anyhow::Result;
use clap::Parser;
use serde::de::DeserializeOwned;

use trialdesk_client::cli::{resource::list_filter, Action, Cli, Commands, OutputFormat};
use trialdesk_client::output::{format_page, format_record, format_records};
use trialdesk_client::{ClientError, TrialdeskClient};
use trialdesk_core::records::{
    AdverseEvent, AuditLog, Document, Entity, Patient, RegulatoryApproval, Site, Trial, User,
    Validate,
};
use trialdesk_core::storage::PageRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = TrialdeskClient::new(&cli.base_url);
    let (format, quiet) = (cli.format, cli.quiet);

    match cli.command {
        Commands::Trials(cmd) => run::<Trial>(&client, cmd.action, format, quiet).await,
        Commands::Sites(cmd) => run::<Site>(&client, cmd.action, format, quiet).await,
        Commands::Patients(cmd) => run::<Patient>(&client, cmd.action, format, quiet).await,
        Commands::Documents(cmd) => run::<Document>(&client, cmd.action, format, quiet).await,
        Commands::AdverseEvents(cmd) => {
            run::<AdverseEvent>(&client, cmd.action, format, quiet).await
        }
        Commands::RegulatoryApprovals(cmd) => {
            run::<RegulatoryApproval>(&client, cmd.action, format, quiet).await
        }
        Commands::AuditLogs(cmd) => run::<AuditLog>(&client, cmd.action, format, quiet).await,
        Commands::Users(cmd) => run::<User>(&client, cmd.action, format, quiet).await,
    }
}

async fn run<T: Entity>(
    client: &TrialdeskClient,
    action: Action,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match action {
        Action::List {
            filters,
            page,
            limit,
        } => {
            let filter = list_filter(filters);
            if page.is_none() && limit.is_none() {
                let records = client.list::<T>(&filter).await?;
                println!("{}", format_records(&records, format));
            } else {
                let request = PageRequest::new(
                    page.unwrap_or(1),
                    limit.unwrap_or(trialdesk_core::storage::DEFAULT_PAGE_LIMIT),
                )
                .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
                let page = client.list_page::<T>(&filter, request).await?;
                println!("{}", format_page(&page, format));
            }
        }
        Action::Get { id } => {
            let record = client.get::<T>(id).await?;
            println!("{}", format_record(&record, format));
        }
        Action::Create { data } => {
            let input: T::Create = parse_input(&data)?;
            let record = client.create::<T>(&input).await?;
            if !quiet && format == OutputFormat::Pretty {
                println!("Created:");
            }
            println!("{}", format_record(&record, format));
        }
        Action::Update { id, data } => {
            let patch: T::Patch = parse_input(&data)?;
            let record = client.update::<T>(id, &patch).await?;
            if !quiet && format == OutputFormat::Pretty {
                println!("Updated:");
            }
            println!("{}", format_record(&record, format));
        }
        Action::Delete { id } => {
            client.delete::<T>(id).await?;
            if !quiet {
                println!("Deleted {} {}", T::ENTITY_TYPE, id);
            }
        }
    }

    Ok(())
}

/// Parses and validates a `--data` document before it is sent.
fn parse_input<I: DeserializeOwned + Validate>(data: &str) -> Result<I, ClientError> {
    let input: I =
        serde_json::from_str(data).map_err(|e| ClientError::InvalidInput(e.to_string()))?;
    input
        .validate()
        .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
    Ok(input)
}
