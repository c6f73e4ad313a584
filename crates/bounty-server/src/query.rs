//! Listing query parameters: parsing, validation and the validated descriptor.
//!
//! [`parse_list_query`] turns the loosely typed query string into a
//! [`ListQuery`] or exactly one [`QueryError`]. Checks run in a fixed order
//! (sortBy, sortOrder, page, limit) and stop at the first failure.

use bounty_storage::{ProgramOrder, SortColumn, SortDirection};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Raw `GET /programs` query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default)]
pub struct RawListQuery {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl RawListQuery {
    /// Collects the listing parameters from decoded query pairs. A repeated
    /// key keeps its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut raw = RawListQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "sortBy" => &mut raw.sort_by,
                "sortOrder" => &mut raw.sort_order,
                "page" => &mut raw.page,
                "limit" => &mut raw.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        raw
    }
}

/// Fields a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    StartDate,
    Eligibility,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::StartDate,
        SortField::Eligibility,
        SortField::CreatedAt,
    ];

    /// The name used in the `sortBy` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::StartDate => "startDate",
            SortField::Eligibility => "eligibility",
            SortField::CreatedAt => "createdAt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// The store column this field sorts on.
    pub fn column(self) -> SortColumn {
        match self {
            SortField::Name => SortColumn::Name,
            SortField::StartDate => SortColumn::StartDate,
            SortField::Eligibility => SortColumn::Eligibility,
            SortField::CreatedAt => SortColumn::CreatedAt,
        }
    }
}

/// Sort direction from the `sortOrder` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn direction(self) -> SortDirection {
        match self {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

/// A validated listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number, always >= 1.
    pub page: u64,
    /// Page size, always in `1..=MAX_LIMIT`.
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    /// Rows to skip before the requested page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(u64::from(self.limit))
    }

    pub fn order(&self) -> ProgramOrder {
        ProgramOrder::new(self.sort_by.column(), self.sort_order.direction())
    }
}

/// Why a listing query was rejected. Display strings are the client-facing
/// error messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid sortBy field. Must be one of: {}", allowed_sort_fields())]
    InvalidSortField(String),

    #[error("Invalid sortOrder. Must be \"asc\" or \"desc\"")]
    InvalidSortOrder(String),

    #[error("Page must be greater than 0")]
    InvalidPage(String),

    #[error("Limit must be between 1 and 100")]
    InvalidLimit(String),
}

fn allowed_sort_fields() -> String {
    SortField::ALL
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// An absent or empty parameter takes its default.
fn param(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parses a non-negative decimal integer, saturating at `u64::MAX`.
fn parse_unsigned(raw: &str) -> Option<u64> {
    let digits = raw.trim();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Validates raw listing parameters into a [`ListQuery`].
pub fn parse_list_query(raw: &RawListQuery) -> Result<ListQuery, QueryError> {
    let defaults = ListQuery::default();

    let sort_by = match param(&raw.sort_by) {
        None => defaults.sort_by,
        Some(s) => SortField::parse(s).ok_or_else(|| QueryError::InvalidSortField(s.into()))?,
    };

    let sort_order = match param(&raw.sort_order) {
        None => defaults.sort_order,
        Some(s) => SortOrder::parse(s).ok_or_else(|| QueryError::InvalidSortOrder(s.into()))?,
    };

    let page = match param(&raw.page) {
        None => defaults.page,
        Some(s) => parse_unsigned(s)
            .filter(|&p| p >= 1)
            .ok_or_else(|| QueryError::InvalidPage(s.into()))?,
    };

    let limit = match param(&raw.limit) {
        None => defaults.limit,
        Some(s) => parse_unsigned(s)
            .and_then(|l| u32::try_from(l).ok())
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| QueryError::InvalidLimit(s.into()))?,
    };

    Ok(ListQuery {
        sort_by,
        sort_order,
        page,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(sort_by: &str, sort_order: &str, page: &str, limit: &str) -> RawListQuery {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawListQuery {
            sort_by: opt(sort_by),
            sort_order: opt(sort_order),
            page: opt(page),
            limit: opt(limit),
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let query = parse_list_query(&RawListQuery::default()).unwrap();
        assert_eq!(query, ListQuery::default());
        assert_eq!(query.order(), ProgramOrder::default());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let query = RawListQuery {
            sort_by: Some(String::new()),
            sort_order: Some(String::new()),
            page: Some(String::new()),
            limit: Some(String::new()),
        };
        assert_eq!(parse_list_query(&query).unwrap(), ListQuery::default());
    }

    #[test]
    fn every_whitelisted_field_maps_to_a_column() {
        for field in SortField::ALL {
            let query = parse_list_query(&raw(field.as_str(), "asc", "", "")).unwrap();
            assert_eq!(query.sort_by, field);
            assert_eq!(query.order().column, field.column());
            assert_eq!(query.order().direction, SortDirection::Asc);
        }
    }

    #[test]
    fn sort_field_error_lists_the_allowed_set() {
        let err = parse_list_query(&raw("invalidField", "", "", "")).unwrap_err();
        assert_eq!(err, QueryError::InvalidSortField("invalidField".to_string()));
        assert_eq!(
            err.to_string(),
            "Invalid sortBy field. Must be one of: name, startDate, eligibility, createdAt"
        );
    }

    #[test]
    fn sort_names_are_case_sensitive() {
        assert!(matches!(
            parse_list_query(&raw("Name", "", "", "")),
            Err(QueryError::InvalidSortField(_))
        ));
        assert!(matches!(
            parse_list_query(&raw("", "ASC", "", "")),
            Err(QueryError::InvalidSortOrder(_))
        ));
    }

    #[test]
    fn error_messages_match_the_api_contract() {
        let cases = [
            (raw("", "invalid", "", ""), "Invalid sortOrder. Must be \"asc\" or \"desc\""),
            (raw("", "", "0", ""), "Page must be greater than 0"),
            (raw("", "", "", "101"), "Limit must be between 1 and 100"),
            (raw("", "", "", "0"), "Limit must be between 1 and 100"),
        ];
        for (query, message) in cases {
            assert_eq!(parse_list_query(&query).unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let pairs = [("page", "1"), ("limit", "5"), ("page", "2"), ("limit", "500"), ("x", "y")]
            .map(|(k, v)| (k.to_string(), v.to_string()));
        let raw = RawListQuery::from_pairs(pairs);
        assert_eq!(raw.page.as_deref(), Some("1"));
        assert_eq!(raw.limit.as_deref(), Some("5"));
        assert_eq!(raw.sort_by, None);
        let query = parse_list_query(&raw).unwrap();
        assert_eq!((query.page, query.limit), (1, 5));
    }

    #[test]
    fn huge_page_numbers_saturate() {
        let query = parse_list_query(&raw("", "", "99999999999999999999", "10")).unwrap();
        assert_eq!(query.page, u64::MAX);
        assert_eq!(query.offset(), u64::MAX);
        assert!(matches!(
            parse_list_query(&raw("", "", "", "99999999999999999999")),
            Err(QueryError::InvalidLimit(_))
        ));
        assert!(matches!(
            parse_list_query(&raw("", "", "-99999999999999999999", "")),
            Err(QueryError::InvalidPage(_))
        ));
    }

    #[test]
    fn non_numeric_page_and_limit_are_rejected() {
        assert!(matches!(
            parse_list_query(&raw("", "", "two", "")),
            Err(QueryError::InvalidPage(_))
        ));
        assert!(matches!(
            parse_list_query(&raw("", "", "", "1.5")),
            Err(QueryError::InvalidLimit(_))
        ));
        assert!(matches!(
            parse_list_query(&raw("", "", "-3", "")),
            Err(QueryError::InvalidPage(_))
        ));
    }

    #[test]
    fn first_failing_check_wins() {
        let everything_wrong = raw("bogus", "sideways", "0", "500");
        assert!(matches!(
            parse_list_query(&everything_wrong),
            Err(QueryError::InvalidSortField(_))
        ));
        assert!(matches!(
            parse_list_query(&raw("name", "sideways", "0", "500")),
            Err(QueryError::InvalidSortOrder(_))
        ));
        assert!(matches!(
            parse_list_query(&raw("name", "asc", "0", "500")),
            Err(QueryError::InvalidPage(_))
        ));
    }

    #[test]
    fn offset_is_zero_based() {
        let query = parse_list_query(&raw("", "", "3", "10")).unwrap();
        assert_eq!(query.offset(), 20);
    }

    proptest! {
        #[test]
        fn valid_page_and_limit_always_parse(page in 1u64..1_000_000, limit in 1u32..=100) {
            let input = raw("", "", &page.to_string(), &limit.to_string());
            let query = parse_list_query(&input).unwrap();
            prop_assert_eq!(query.page, page);
            prop_assert_eq!(query.limit, limit);
            prop_assert_eq!(query.offset(), (page - 1) * u64::from(limit));
        }

        #[test]
        fn out_of_range_limit_is_always_rejected(
            limit in prop_oneof![-1000i64..=0, 101i64..100_000],
            page in 1u64..50,
        ) {
            let input = raw("name", "asc", &page.to_string(), &limit.to_string());
            let result = parse_list_query(&input);
            prop_assert!(matches!(result, Err(QueryError::InvalidLimit(_))));
        }

        #[test]
        fn page_zero_is_rejected_regardless_of_limit(limit in 0i64..1000) {
            let result = parse_list_query(&raw("", "", "0", &limit.to_string()));
            prop_assert!(matches!(result, Err(QueryError::InvalidPage(_))));
        }

        #[test]
        fn unknown_sort_fields_are_rejected(field in "[a-zA-Z]{1,12}") {
            prop_assume!(SortField::parse(&field).is_none());
            let result = parse_list_query(&raw(&field, "", "", ""));
            prop_assert!(matches!(result, Err(QueryError::InvalidSortField(_))));
        }
    }
}
