//! Pagination, sort, search and filter parameters for admin list pages.
//!
//! Every data table keeps its state in the location's query string. This
//! module turns that string into a validated [`ListQuery`] and back, and
//! merges incremental changes (a new sort column, a cleared filter) into it.
//!
//! Nothing here fails. The query string is user-editable, so anything that
//! does not validate is silently replaced by the page's [`ListDefaults`]:
//!
//! | Key         | Accepted                                   | Default |
//! |-------------|--------------------------------------------|---------|
//! | `page`      | integer `> 0`                              | `1`     |
//! | `per_page`  | integer `> 0`                              | `10`    |
//! | `sort`      | any non-empty string                       | `id`    |
//! | `direction` | `asc` or `desc`                            | `desc`  |
//! | `search`    | any string                                 | empty   |
//!
//! Any other key (`status`, `team`, `started_at`, ...) is carried through as
//! a string filter.
//!
//! # Example
//!
//! ```
//! use gpui_access_gate::{ListDefaults, ListQuery, QueryParams, SortDirection};
//!
//! let url = QueryParams::from_query_string("page=-1&per_page=abc&direction=sideways&status=active");
//! let query = ListQuery::parse(Some(&url), &ListDefaults::default());
//!
//! assert_eq!(query.page, 1);
//! assert_eq!(query.per_page, 10);
//! assert_eq!(query.direction, SortDirection::Desc);
//! assert_eq!(query.filters.get("status").map(String::as_str), Some("active"));
//! ```

use crate::params::QueryParams;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keys with a fixed meaning; everything else is a filter.
pub const RESERVED_KEYS: [&str; 5] = ["page", "per_page", "sort", "direction", "search"];

// ============================================================================
// SortDirection
// ============================================================================

/// Sort order of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// The other direction, for a header click on the active column.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    /// Exactly `asc` or `desc`; nothing else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ListDefaults
// ============================================================================

/// Per-page fallback values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDefaults {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub direction: SortDirection,
}

impl ListDefaults {
    /// Defaults with a different page size, e.g. `25` for the invoices table.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Defaults with a different sort column and direction.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = sort.into();
        self.direction = direction;
        self
    }
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            sort: "id".to_string(),
            direction: SortDirection::Desc,
        }
    }
}

// ============================================================================
// ListQuery
// ============================================================================

/// Validated list parameters.
///
/// `page >= 1` and `per_page >= 1` hold for every value produced by this
/// module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub direction: SortDirection,
    pub search: String,
    /// Page-specific filters, in key order.
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// Query holding only `defaults`.
    pub fn from_defaults(defaults: &ListDefaults) -> Self {
        Self {
            page: defaults.page.max(1),
            per_page: defaults.per_page.max(1),
            sort: defaults.sort.clone(),
            direction: defaults.direction,
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    /// Read list parameters from a query string, falling back to `defaults`.
    ///
    /// `None` (no query string at all) yields the defaults.
    pub fn parse(params: Option<&QueryParams>, defaults: &ListDefaults) -> Self {
        let mut query = Self::from_defaults(defaults);
        let Some(params) = params else {
            return query;
        };

        query.page = params
            .get("page")
            .and_then(parse_positive)
            .unwrap_or(query.page);
        query.per_page = params
            .get("per_page")
            .and_then(parse_positive)
            .unwrap_or(query.per_page);
        if let Some(sort) = params.get("sort").filter(|s| !s.is_empty()) {
            query.sort = sort.to_string();
        }
        query.direction = params
            .get("direction")
            .and_then(|d| d.parse().ok())
            .unwrap_or(query.direction);
        if let Some(search) = params.get("search") {
            query.search = search.to_string();
        }

        for (key, value) in params.iter() {
            if !RESERVED_KEYS.contains(&key) && !key.is_empty() {
                query
                    .filters
                    .entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        query
    }

    /// Parse a raw query string such as `"?page=2&status=active"`.
    pub fn from_query_string(query: &str, defaults: &ListDefaults) -> Self {
        Self::parse(Some(&QueryParams::from_query_string(query)), defaults)
    }

    /// Write every non-empty value into [`QueryParams`].
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.append("page", self.page.to_string());
        params.append("per_page", self.per_page.to_string());
        if !self.sort.is_empty() {
            params.append("sort", self.sort.as_str());
        }
        params.append("direction", self.direction.as_str());
        if !self.search.is_empty() {
            params.append("search", self.search.as_str());
        }
        for (key, value) in &self.filters {
            if !value.is_empty() {
                params.append(key.as_str(), value.as_str());
            }
        }
        params
    }

    /// Serialize for the browser URL. Empty values are left out entirely.
    pub fn serialize(&self) -> String {
        self.to_params().to_query_string()
    }

    /// Value of a filter, if set and non-empty.
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

// ============================================================================
// Merging
// ============================================================================

/// An incremental change to a [`ListQuery`].
///
/// Fields carry raw values as they come from UI widgets; they are validated
/// when merged, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQueryUpdate {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub search: Option<String>,
    /// Filter changes. An empty string clears the filter.
    pub filters: BTreeMap<String, String>,
}

impl ListQueryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

/// Overlay `updates` on `current`, then re-validate the result.
///
/// `page`, `per_page` and `direction` are clamped after the overlay, so an
/// invalid value introduced by `updates` falls back just like one read from
/// the URL: `page` to 1, `per_page` and `direction` to `defaults`.
pub fn merge_parameters(
    current: &ListQuery,
    updates: ListQueryUpdate,
    defaults: &ListDefaults,
) -> ListQuery {
    let mut merged = current.clone();
    if merged.page == 0 {
        merged.page = defaults.page.max(1);
    }
    if merged.per_page == 0 {
        merged.per_page = defaults.per_page.max(1);
    }
    if merged.sort.is_empty() {
        merged.sort = defaults.sort.clone();
    }

    if let Some(page) = updates.page {
        merged.page = positive_u32(page).unwrap_or(1);
    }
    if let Some(per_page) = updates.per_page {
        merged.per_page = positive_u32(per_page).unwrap_or_else(|| defaults.per_page.max(1));
    }
    if let Some(sort) = updates.sort {
        merged.sort = if sort.is_empty() { defaults.sort.clone() } else { sort };
    }
    if let Some(direction) = updates.direction {
        merged.direction = direction.parse().unwrap_or(defaults.direction);
    }
    if let Some(search) = updates.search {
        merged.search = search;
    }
    for (key, value) in updates.filters {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if value.is_empty() {
            merged.filters.remove(&key);
        } else {
            merged.filters.insert(key, value);
        }
    }

    merged
}

// ============================================================================
// Default list URL
// ============================================================================

/// Options for [`build_default_list_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUrlOptions {
    /// Keep the caller's current `per_page`. Defaults to `true`.
    pub preserve_per_page: bool,
    pub defaults: ListDefaults,
}

impl Default for ListUrlOptions {
    fn default() -> Self {
        Self {
            preserve_per_page: true,
            defaults: ListDefaults::default(),
        }
    }
}

/// URL of page 1 of a freshly sorted list at `pathname`.
///
/// Used after a create or update so the user lands on the first page
/// without losing the page size they picked.
pub fn build_default_list_url(
    pathname: &str,
    current: &QueryParams,
    options: ListUrlOptions,
) -> String {
    let defaults = &options.defaults;
    let per_page = if options.preserve_per_page {
        current
            .get("per_page")
            .and_then(parse_positive)
            .unwrap_or_else(|| defaults.per_page.max(1))
    } else {
        defaults.per_page.max(1)
    };

    let mut params = QueryParams::new();
    params.append("page", "1");
    params.append("per_page", per_page.to_string());
    params.append("sort", defaults.sort.as_str());
    params.append("direction", defaults.direction.as_str());

    format!("{}?{}", pathname, params.to_query_string())
}

// ============================================================================
// Coercion
// ============================================================================

/// Accept `raw` only if it is a finite integer strictly greater than zero
/// that fits in `u32`. `"0"`, `"-5"`, `"abc"`, `""` and `"1.5"` are rejected.
///
/// Values above `u32::MAX` (`"99999999999"`) are treated as invalid too.
pub fn parse_positive(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<u64>() {
        return u32::try_from(n).ok().filter(|n| *n > 0);
    }
    let n = raw.parse::<f64>().ok()?;
    if !n.is_finite() || n.fract() != 0.0 || n < 1.0 || n > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(n as u32)
}

fn positive_u32(n: i64) -> Option<u32> {
    u32::try_from(n).ok().filter(|n| *n > 0)
}

// ============================================================================
// Tests
// ============================================================================
