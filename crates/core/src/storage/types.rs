use std::collections::BTreeMap;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::records::{Entity, ValidationError};

/// Page size used when only `page` is given.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size a caller can ask for; larger values are clamped.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Equality filter over the JSON form of a record.
///
/// An item matches when every named field equals the expected value. Strings
/// compare verbatim, other JSON values by their JSON text (`true`, `42`,
/// `null`). A field the record does not have never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListFilter(BTreeMap<String, String>);

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Checks a record against the filter.
    pub fn matches<T: Serialize>(&self, item: &T) -> bool {
        if self.is_empty() {
            return true;
        }
        match serde_json::to_value(item) {
            Ok(value) => self.matches_value(&value),
            Err(_) => false,
        }
    }

    /// Checks an already-serialized record against the filter.
    pub fn matches_value(&self, value: &Value) -> bool {
        self.0.iter().all(|(field, expected)| match value.get(field) {
            Some(Value::String(actual)) => actual == expected,
            Some(other) => other.to_string() == *expected,
            None => false,
        })
    }
}

/// Canonical `field=value&...` form, `*` for an empty filter. Used in cache keys.
///
/// `%`, `&` and `=` inside fields and values are percent-encoded, so two
/// different filters never render the same.
impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("*");
        }
        let mut first = true;
        for (field, value) in &self.0 {
            if !first {
                f.write_str("&")?;
            }
            write_escaped(f, field)?;
            f.write_str("=")?;
            write_escaped(f, value)?;
            first = false;
        }
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '%' => f.write_str("%25")?,
            '&' => f.write_str("%26")?,
            '=' => f.write_str("%3D")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

impl FromIterator<(String, String)> for ListFilter {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a page request. Zero is rejected for both values; `limit` is
    /// clamped to [`MAX_PAGE_LIMIT`].
    pub fn new(page: u32, limit: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(invalid_parameter("page", "must be a positive integer"));
        }
        if limit == 0 {
            return Err(invalid_parameter("limit", "must be a positive integer"));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_LIMIT),
        })
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of items matching the filter across all pages.
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

/// Slices an already filtered and ordered listing.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit as usize)
        .collect();

    Page {
        items,
        total,
        page: request.page,
        limit: request.limit,
    }
}

/// Orders records by creation time, then id, so listings are stable.
pub fn sort_by_creation<T: Entity>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

/// Applies a filter and the listing order to a set of records.
pub fn select_matching<T: Entity>(items: impl IntoIterator<Item = T>, filter: &ListFilter) -> Vec<T> {
    let mut matching: Vec<T> = items.into_iter().filter(|i| filter.matches(i)).collect();
    sort_by_creation(&mut matching);
    matching
}

/// A parsed list request: equality filters plus optional pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: ListFilter,
    pub page: Option<PageRequest>,
}

impl ListQuery {
    /// Splits raw query parameters into `page`/`limit` and filters.
    ///
    /// Pagination is only applied when at least one of `page` or `limit` is
    /// present; the missing one takes its default.
    pub fn from_params(mut params: BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let page = params
            .remove("page")
            .map(|v| parse_positive("page", &v))
            .transpose()?;
        let limit = params
            .remove("limit")
            .map(|v| parse_positive("limit", &v))
            .transpose()?;

        let page = match (page, limit) {
            (None, None) => None,
            (page, limit) => Some(PageRequest::new(
                page.unwrap_or(1),
                limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            )?),
        };

        Ok(Self {
            filter: params.into_iter().collect(),
            page,
        })
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u32, ValidationError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid_parameter(name, "must be a positive integer"))
}

fn invalid_parameter(name: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{NewTrial, Trial, TrialPhase, TrialStatus};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn trial(title: &str, status: TrialStatus, offset_secs: i64) -> Trial {
        let mut input = NewTrial::new(title, "P-1", TrialPhase::Phase1, "Sponsor");
        input.status = status;
        Trial::from_create(
            Uuid::new_v4(),
            input,
            Utc::now() + Duration::seconds(offset_secs),
        )
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let t = trial("A", TrialStatus::Recruiting, 0);
        assert!(ListFilter::new().matches(&t));
    }

    #[test]
    fn test_filter_matches_enum_and_string_fields() {
        let t = trial("Trial A", TrialStatus::Recruiting, 0);

        assert!(ListFilter::new().with("status", "recruiting").matches(&t));
        assert!(ListFilter::new()
            .with("status", "recruiting")
            .with("title", "Trial A")
            .matches(&t));
        assert!(!ListFilter::new().with("status", "completed").matches(&t));
    }

    #[test]
    fn test_filter_null_and_unknown_fields() {
        let t = trial("Trial A", TrialStatus::Recruiting, 0);

        assert!(ListFilter::new().with("description", "null").matches(&t));
        assert!(!ListFilter::new().with("no_such_field", "x").matches(&t));
    }

    #[test]
    fn test_filter_compares_booleans_by_json_text() {
        let value = serde_json::json!({ "serious": true, "count": 3 });
        assert!(ListFilter::new().with("serious", "true").matches_value(&value));
        assert!(ListFilter::new().with("count", "3").matches_value(&value));
        assert!(!ListFilter::new().with("serious", "yes").matches_value(&value));
    }

    #[test]
    fn test_filter_display_is_canonical() {
        let a = ListFilter::new().with("status", "active").with("country", "US");
        let b = ListFilter::new().with("country", "US").with("status", "active");
        assert_eq!(a.to_string(), "country=US&status=active");
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(ListFilter::new().to_string(), "*");
    }

    #[test]
    fn test_filter_display_escapes_separators() {
        let two_fields = ListFilter::new().with("status", "recruiting").with("title", "X");
        let one_field = ListFilter::new().with("status", "recruiting&title=X");

        assert_eq!(one_field.to_string(), "status=recruiting%26title%3DX");
        assert_ne!(one_field.to_string(), two_fields.to_string());
        assert_eq!(
            ListFilter::new().with("note", "100%").to_string(),
            "note=100%25"
        );
    }

    #[test]
    fn test_select_matching_orders_by_creation() {
        let late = trial("late", TrialStatus::Recruiting, 10);
        let early = trial("early", TrialStatus::Recruiting, -10);
        let other = trial("other", TrialStatus::Completed, 0);

        let result = select_matching(
            vec![late.clone(), other, early.clone()],
            &ListFilter::new().with("status", "recruiting"),
        );

        assert_eq!(result, vec![early, late]);
    }

    #[test]
    fn test_paginate_slices_and_counts() {
        let items: Vec<u32> = (1..=45).collect();

        let page = paginate(items.clone(), PageRequest::new(3, 20).unwrap());
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total, 45);
        assert_eq!(page.page, 3);

        let past_end = paginate(items, PageRequest::new(9, 20).unwrap());
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 45);
    }

    #[test]
    fn test_page_request_rejects_zero_and_clamps_limit() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert_eq!(PageRequest::new(1, 1000).unwrap().limit, MAX_PAGE_LIMIT);
        assert_eq!(PageRequest::new(2, 10).unwrap().offset(), 10);
    }

    #[test]
    fn test_list_query_without_pagination() {
        let query = ListQuery::from_params(params(&[("status", "active")])).unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.filter, ListFilter::new().with("status", "active"));
    }

    #[test]
    fn test_list_query_fills_missing_pagination_values() {
        let query = ListQuery::from_params(params(&[("page", "2")])).unwrap();
        assert_eq!(
            query.page,
            Some(PageRequest {
                page: 2,
                limit: DEFAULT_PAGE_LIMIT
            })
        );
        assert!(query.filter.is_empty());

        let query = ListQuery::from_params(params(&[("limit", "5")])).unwrap();
        assert_eq!(query.page, Some(PageRequest { page: 1, limit: 5 }));
    }

    #[test]
    fn test_list_query_rejects_bad_numbers() {
        let err = ListQuery::from_params(params(&[("page", "abc")])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidParameter { ref name, .. } if name == "page"
        ));
        assert!(ListQuery::from_params(params(&[("limit", "-1")])).is_err());
        assert!(ListQuery::from_params(params(&[("limit", "0")])).is_err());
    }
}
