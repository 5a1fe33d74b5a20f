//! Apartment listing search: query-string parameters to filter predicate.
//!
//! [`ListingSearchParams`] is the raw, all-optional parameter set accepted by
//! `GET /apartments`. [`ListingQuery::from_params`] turns it into a typed
//! [`ListingQuery`]: a [`ListingFilter`] plus ordering and paging. Stores
//! either translate the filter into SQL or evaluate it in process through
//! [`ListingFilter::matches`].

use serde::Deserialize;

use crate::error::CoreError;
use crate::numeric::{parse_leading_float, parse_leading_int};

// ---------------------------------------------------------------------------
// Paging limits
// ---------------------------------------------------------------------------

/// Maximum number of listings returned by one paged search.
pub const MAX_PAGE_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /apartments` (`?search=&unitName=&priceMin=...`).
///
/// Every value is kept as the caller sent it; interpretation happens in
/// [`ListingQuery::from_params`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSearchParams {
    pub search: Option<String>,
    pub unit_name: Option<String>,
    pub unit_number: Option<String>,
    pub project: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub featured: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListingSearchParams {
    /// True when no parameter carries a usable value.
    ///
    /// Blank strings count as absent, so `?search=` lists everything.
    pub fn is_empty(&self) -> bool {
        [
            &self.search,
            &self.unit_name,
            &self.unit_number,
            &self.project,
            &self.property_type,
            &self.bedrooms,
            &self.bathrooms,
            &self.price_min,
            &self.price_max,
            &self.featured,
            &self.sort,
            &self.limit,
            &self.offset,
        ]
        .into_iter()
        .all(|v| non_blank(v).is_none())
    }
}

// ---------------------------------------------------------------------------
// Typed query
// ---------------------------------------------------------------------------

/// How the generic `search` term interacts with the field filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// `search` is ANDed with every other filter.
    #[default]
    Combined,
    /// A present `search` term discards all other filters.
    SearchOverrides,
}

/// Inclusive price bounds. A missing upper bound is open-ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

/// Result ordering for a listing search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending identifier, i.e. insertion order.
    #[default]
    Insertion,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortOrder {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            other => Err(CoreError::Validation(format!(
                "Unknown sort '{other}', expected one of: price_asc, price_desc, newest"
            ))),
        }
    }
}

/// Offset/limit window over the ordered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.map(|l| l.clamp(1, MAX_PAGE_LIMIT)),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

/// The field predicates of a listing search. `None` means "not filtered".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive substring over unit name, unit number or project.
    pub search: Option<String>,
    pub unit_name: Option<String>,
    pub unit_number: Option<String>,
    pub project: Option<String>,
    /// Exact, case-sensitive match.
    pub property_type: Option<String>,
    pub min_bedrooms: Option<i64>,
    pub min_bathrooms: Option<f64>,
    pub price: Option<PriceRange>,
    pub featured: Option<bool>,
}

/// Borrowed view of the listing fields a filter inspects.
#[derive(Debug, Clone, Copy)]
pub struct ListingView<'a> {
    pub unit_name: &'a str,
    pub unit_number: &'a str,
    pub project: &'a str,
    pub property_type: &'a str,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub price: f64,
    pub featured: bool,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluate the filter against one listing.
    pub fn matches(&self, listing: &ListingView<'_>) -> bool {
        if let Some(term) = &self.search {
            if !(contains_ci(listing.unit_name, term)
                || contains_ci(listing.unit_number, term)
                || contains_ci(listing.project, term))
            {
                return false;
            }
        }
        if let Some(term) = &self.unit_name {
            if !contains_ci(listing.unit_name, term) {
                return false;
            }
        }
        if let Some(term) = &self.unit_number {
            if !contains_ci(listing.unit_number, term) {
                return false;
            }
        }
        if let Some(term) = &self.project {
            if !contains_ci(listing.project, term) {
                return false;
            }
        }
        if let Some(property_type) = &self.property_type {
            if listing.property_type != property_type.as_str() {
                return false;
            }
        }
        if let Some(min) = self.min_bedrooms {
            if i64::from(listing.bedrooms) < min {
                return false;
            }
        }
        if let Some(min) = self.min_bathrooms {
            if listing.bathrooms < min {
                return false;
            }
        }
        if let Some(range) = &self.price {
            if !range.contains(listing.price) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if listing.featured != featured {
                return false;
            }
        }
        true
    }
}

/// A fully interpreted listing search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub filter: ListingFilter,
    pub sort: SortOrder,
    pub page: Page,
}

impl ListingQuery {
    /// Interpret raw query parameters.
    ///
    /// Numeric values are read leniently (see [`crate::numeric`]); a value
    /// with no numeric prefix is a validation error. A max-only price bound
    /// becomes `[0, max]`.
    pub fn from_params(params: &ListingSearchParams, mode: SearchMode) -> Result<Self, CoreError> {
        let search = non_blank(&params.search).map(str::to_string);

        let filter = if search.is_some() && mode == SearchMode::SearchOverrides {
            ListingFilter {
                search,
                ..ListingFilter::default()
            }
        } else {
            let min_bedrooms = non_blank(&params.bedrooms)
                .map(|v| parse_leading_int(v).ok_or_else(|| invalid_number("bedrooms", v)))
                .transpose()?;
            let min_bathrooms = non_blank(&params.bathrooms)
                .map(|v| parse_leading_float(v).ok_or_else(|| invalid_number("bathrooms", v)))
                .transpose()?;
            let price_min = non_blank(&params.price_min)
                .map(|v| parse_leading_float(v).ok_or_else(|| invalid_number("priceMin", v)))
                .transpose()?;
            let price_max = non_blank(&params.price_max)
                .map(|v| parse_leading_float(v).ok_or_else(|| invalid_number("priceMax", v)))
                .transpose()?;

            let price = match (price_min, price_max) {
                (None, None) => None,
                (min, max) => Some(PriceRange {
                    min: min.unwrap_or(0.0),
                    max,
                }),
            };

            ListingFilter {
                search,
                unit_name: non_blank(&params.unit_name).map(str::to_string),
                unit_number: non_blank(&params.unit_number).map(str::to_string),
                project: non_blank(&params.project).map(str::to_string),
                property_type: non_blank(&params.property_type).map(str::to_string),
                min_bedrooms,
                min_bathrooms,
                price,
                featured: non_blank(&params.featured).map(parse_flag).transpose()?,
            }
        };

        let limit = non_blank(&params.limit)
            .map(|v| parse_leading_int(v).ok_or_else(|| invalid_number("limit", v)))
            .transpose()?;
        let offset = non_blank(&params.offset)
            .map(|v| parse_leading_int(v).ok_or_else(|| invalid_number("offset", v)))
            .transpose()?;

        let sort = non_blank(&params.sort)
            .map(SortOrder::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            filter,
            sort,
            page: Page::new(limit, offset),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wrap a user term in `%...%` for `ILIKE`, escaping `\`, `%` and `_`.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Result<bool, CoreError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CoreError::Validation(format!(
            "featured must be true or false, got '{value}'"
        ))),
    }
}

fn invalid_number(field: &str, value: &str) -> CoreError {
    CoreError::Validation(format!("{field} must be a number, got '{value}'"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
