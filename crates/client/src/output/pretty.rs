//! Pretty output formatting.

use trialdesk_core::records::Entity;
use trialdesk_core::storage::Page;

/// Format a record for display.
pub fn format_record<T: Entity>(record: &T) -> String {
    format!(
        "{}\n  ID: {}\n  Created: {}\n  Updated: {}",
        record.label(),
        record.id(),
        record.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
        record.updated_at().format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Format records for display.
pub fn format_records<T: Entity>(records: &[T]) -> String {
    if records.is_empty() {
        return format!("No {} found.", collection_title::<T>().to_lowercase());
    }
    let mut output = format!("{} ({})\n", collection_title::<T>(), records.len());
    output.push_str(&"-".repeat(40));
    for record in records {
        output.push_str(&format!("\n{}", format_record(record)));
        output.push('\n');
    }
    output
}

/// Format one page of records, with its position in the full listing.
pub fn format_page<T: Entity>(page: &Page<T>) -> String {
    let pages = page.total.div_ceil(page.limit.max(1) as usize).max(1);
    let mut output = format_records(&page.items);
    output.push_str(&format!(
        "\nPage {} of {} ({} total)",
        page.page, pages, page.total
    ));
    output
}

fn collection_title<T: Entity>() -> String {
    T::COLLECTION.replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use trialdesk_core::records::{NewSite, Site};

    fn site(name: &str) -> Site {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Site::from_create(
            Uuid::nil(),
            NewSite {
                trial_id: Uuid::nil(),
                name: name.to_string(),
                city: "Boston".to_string(),
                country: "US".to_string(),
                principal_investigator: "Dr. Reyes".to_string(),
                status: Default::default(),
            },
            now,
        )
    }

    #[test]
    fn test_format_record() {
        let output = format_record(&site("General Hospital"));

        assert!(output.starts_with("General Hospital (Boston, US)"));
        assert!(output.contains(&format!("ID: {}", Uuid::nil())));
        assert!(output.contains("Created: 2024-03-01 09:30:00 UTC"));
    }

    #[test]
    fn test_format_empty_records() {
        assert_eq!(format_records::<Site>(&[]), "No sites found.");
    }

    #[test]
    fn test_format_page_footer() {
        let page = Page {
            items: vec![site("A"), site("B")],
            total: 5,
            page: 1,
            limit: 2,
        };

        let output = format_page(&page);
        assert!(output.starts_with("SITES (2)"));
        assert!(output.ends_with("Page 1 of 3 (5 total)"));
    }
}
