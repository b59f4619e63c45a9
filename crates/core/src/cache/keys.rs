use uuid::Uuid;

use crate::storage::ListFilter;

/// Cache key for a single record: `{collection}:{id}`.
pub fn entity_key(collection: &str, id: Uuid) -> String {
    format!("{}:{}", collection, id)
}

/// Cache key for a filtered listing: `{collection}:list:{filter}`.
pub fn list_key(collection: &str, filter: &ListFilter) -> String {
    format!("{}:list:{}", collection, filter)
}

/// Pattern matching every key of a collection, used for wholesale invalidation.
pub fn collection_pattern(collection: &str) -> String {
    format!("{}:*", collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::pattern_matches;

    #[test]
    fn test_entity_key() {
        assert_eq!(
            entity_key("trials", Uuid::nil()),
            "trials:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_list_key() {
        assert_eq!(list_key("sites", &ListFilter::new()), "sites:list:*");
        assert_eq!(
            list_key("sites", &ListFilter::new().with("status", "active")),
            "sites:list:status=active"
        );
    }

    #[test]
    fn test_collection_pattern_covers_all_keys() {
        let pattern = collection_pattern("adverse_events");
        assert_eq!(pattern, "adverse_events:*");
        assert!(pattern_matches(&pattern, &entity_key("adverse_events", Uuid::nil())));
        assert!(pattern_matches(
            &pattern,
            &list_key("adverse_events", &ListFilter::new().with("serious", "true"))
        ));
        assert!(!pattern_matches(&pattern, &entity_key("trials", Uuid::nil())));
    }
}
