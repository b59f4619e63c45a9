//! Actions shared by every collection.

use clap::{Parser, Subcommand};
use uuid::Uuid;

use trialdesk_core::storage::ListFilter;

/// Commands for one collection.
#[derive(Debug, Parser)]
pub struct ResourceCommand {
    #[command(subcommand)]
    pub action: Action,
}

/// Available actions.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// List records, optionally filtered and paginated.
    List {
        /// Equality filter as FIELD=VALUE (repeatable).
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        /// Page number (1-based).
        #[arg(long)]
        page: Option<u32>,
        /// Page size.
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a record by ID.
    Get {
        /// Record ID.
        id: Uuid,
    },
    /// Create a record from a JSON document.
    Create {
        /// Record fields as JSON.
        #[arg(long)]
        data: String,
    },
    /// Update some fields of a record.
    Update {
        /// Record ID.
        id: Uuid,
        /// Fields to change as JSON.
        #[arg(long)]
        data: String,
    },
    /// Delete a record by ID.
    Delete {
        /// Record ID.
        id: Uuid,
    },
}

/// Builds the list filter from repeated `--filter` arguments.
pub fn list_filter(filters: Vec<(String, String)>) -> ListFilter {
    filters.into_iter().collect()
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    if field.is_empty() {
        return Err("filter field cannot be empty".to_string());
    }
    if field == "page" || field == "limit" {
        return Err(format!("use --{field} instead of --filter {field}=..."));
    }
    Ok((field.to_string(), value.to_string()))
}
