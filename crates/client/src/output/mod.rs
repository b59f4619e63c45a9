//! Output formatting functions.

pub mod json;
pub mod pretty;

use trialdesk_core::records::Entity;
use trialdesk_core::storage::Page;

use crate::cli::OutputFormat;

/// Format a single record.
pub fn format_record<T: Entity>(record: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(record),
        OutputFormat::Pretty => pretty::format_record(record),
    }
}

/// Format a full listing.
pub fn format_records<T: Entity>(records: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(&records),
        OutputFormat::Pretty => pretty::format_records(records),
    }
}

/// Format one page of a listing.
pub fn format_page<T: Entity>(page: &Page<T>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(page),
        OutputFormat::Pretty => pretty::format_page(page),
    }
}
