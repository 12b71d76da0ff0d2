//! Catalog query parameter validation.
//!
//! Normalizes raw pagination, sort and filter inputs into a canonical query
//! spec. Pure functions, no side effects.

use serde::{Deserialize, Serialize};

use super::catalog::OwnerId;
use super::error::DomainError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Raw query parameters as the boundary layer received them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogQuery {
    pub user_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub is_published: Option<String>,
}

/// Canonical sort field. `Date` maps to the record creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Date,
    Views,
    Title,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishedFilter {
    Published,
    Unpublished,
    All,
}

impl PublishedFilter {
    /// Equality filter value, or `None` when everything matches.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PublishedFilter::Published => Some(true),
            PublishedFilter::Unpublished => Some(false),
            PublishedFilter::All => None,
        }
    }
}

/// Validated catalog query spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub owner: OwnerId,
    pub published: PublishedFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-based page number.
    pub page: u32,
    /// Page size, clamped to the configured maximum.
    pub limit: u32,
}

impl CatalogQuery {
    /// Validate raw parameters into a canonical spec.
    ///
    /// Unrecognized values fail with a validation error naming the offending
    /// field; an absent owner fails as a missing parameter.
    pub fn validate(raw: &RawCatalogQuery, max_limit: u32) -> Result<Self, DomainError> {
        let owner = match raw.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => OwnerId::from(id),
            _ => return Err(DomainError::MissingParameter { field: "userId" }),
        };

        let page = parse_positive(raw.page.as_deref(), "page", DEFAULT_PAGE)?;
        let limit = parse_positive(raw.limit.as_deref(), "limit", DEFAULT_LIMIT)?.min(max_limit);

        let sort_field = match normalized(raw.sort_by.as_deref()).as_deref() {
            None | Some("date") => SortField::Date,
            Some("views") => SortField::Views,
            Some("title") => SortField::Title,
            Some("duration") => SortField::Duration,
            Some(other) => {
                return Err(DomainError::validation(
                    "sortBy",
                    format!("unrecognized value '{}'", other),
                ))
            }
        };

        let sort_direction = match normalized(raw.sort_type.as_deref()).as_deref() {
            None | Some("1") | Some("asc") | Some("ascending") => SortDirection::Ascending,
            Some("-1") | Some("desc") | Some("descending") => SortDirection::Descending,
            Some(other) => {
                return Err(DomainError::validation(
                    "sortType",
                    format!("unrecognized value '{}'", other),
                ))
            }
        };

        let published = match normalized(raw.is_published.as_deref()).as_deref() {
            None | Some("published") | Some("true") => PublishedFilter::Published,
            Some("unpublished") | Some("false") => PublishedFilter::Unpublished,
            Some("all") => PublishedFilter::All,
            Some(other) => {
                return Err(DomainError::validation(
                    "isPublished",
                    format!("unrecognized value '{}'", other),
                ))
            }
        };

        Ok(Self {
            owner,
            published,
            sort_field,
            sort_direction,
            page,
            limit,
        })
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_lowercase())
}

fn parse_positive(value: Option<&str>, field: &'static str, default: u32) -> Result<u32, DomainError> {
    match value.map(str::trim) {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(DomainError::validation(
                field,
                format!("expected a positive integer, got '{}'", raw),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(user_id: Option<&str>) -> RawCatalogQuery {
        RawCatalogQuery {
            user_id: user_id.map(String::from),
            ..RawCatalogQuery::default()
        }
    }

    #[test]
    fn defaults_apply_when_only_owner_is_given() {
        let spec = CatalogQuery::validate(&raw(Some("u1")), 100).unwrap();
        assert_eq!(spec.owner, OwnerId::from("u1"));
        assert_eq!(spec.page, DEFAULT_PAGE);
        assert_eq!(spec.limit, DEFAULT_LIMIT);
        assert_eq!(spec.sort_field, SortField::Date);
        assert_eq!(spec.sort_direction, SortDirection::Ascending);
        assert_eq!(spec.published, PublishedFilter::Published);
    }

    #[test]
    fn owner_is_mandatory() {
        let err = CatalogQuery::validate(&raw(None), 100).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingParameter { field: "userId" }
        ));

        let err = CatalogQuery::validate(&raw(Some("   ")), 100).unwrap_err();
        assert!(matches!(
            err,
            DomainError::MissingParameter { field: "userId" }
        ));
    }

    #[test]
    fn limit_is_clamped_to_the_configured_maximum() {
        let mut input = raw(Some("u1"));
        input.limit = Some("5000".into());
        let spec = CatalogQuery::validate(&input, 100).unwrap();
        assert_eq!(spec.limit, 100);
    }

    #[test]
    fn page_must_be_a_positive_integer() {
        for bad in ["0", "-3", "abc", "1.5"] {
            let mut input = raw(Some("u1"));
            input.page = Some(bad.into());
            let err = CatalogQuery::validate(&input, 100).unwrap_err();
            assert!(matches!(err, DomainError::Validation { field: "page", .. }), "{bad}");
        }
    }

    #[test]
    fn sort_type_accepts_numeric_and_symbolic_forms() {
        for (value, expected) in [
            ("1", SortDirection::Ascending),
            ("asc", SortDirection::Ascending),
            ("Ascending", SortDirection::Ascending),
            ("-1", SortDirection::Descending),
            ("desc", SortDirection::Descending),
            (" DESCENDING ", SortDirection::Descending),
        ] {
            let mut input = raw(Some("u1"));
            input.sort_type = Some(value.into());
            let spec = CatalogQuery::validate(&input, 100).unwrap();
            assert_eq!(spec.sort_direction, expected, "{value}");
        }
    }

    #[test]
    fn unrecognized_sort_field_names_the_offender() {
        let mut input = raw(Some("u1"));
        input.sort_by = Some("likes".into());
        let err = CatalogQuery::validate(&input, 100).unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "sortBy", .. }));
    }

    #[test]
    fn published_filter_accepts_both_spellings() {
        for (value, expected) in [
            ("published", PublishedFilter::Published),
            ("true", PublishedFilter::Published),
            ("unpublished", PublishedFilter::Unpublished),
            ("false", PublishedFilter::Unpublished),
            ("all", PublishedFilter::All),
        ] {
            let mut input = raw(Some("u1"));
            input.is_published = Some(value.into());
            let spec = CatalogQuery::validate(&input, 100).unwrap();
            assert_eq!(spec.published, expected, "{value}");
        }

        let mut input = raw(Some("u1"));
        input.is_published = Some("maybe".into());
        let err = CatalogQuery::validate(&input, 100).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "isPublished",
                ..
            }
        ));
    }

    #[test]
    fn date_maps_to_the_creation_time_field() {
        let mut input = raw(Some("u1"));
        input.sort_by = Some(" Date ".into());
        let spec = CatalogQuery::validate(&input, 100).unwrap();
        assert_eq!(spec.sort_field, SortField::Date);
    }
}
