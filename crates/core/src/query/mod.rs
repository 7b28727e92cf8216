//! Search, sort and pagination semantics shared by the server and the client.
//!
//! The storage backends and the client-side mirror evaluate the same
//! [`StudentFilter`] and comparator; the only configured difference is
//! [`AgeMatch`].

mod filter;
mod sort;
#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env_config::QueryLimits;
use crate::error::CoreError;
use crate::student::Student;

pub use filter::{AgeMatch, StudentFilter, parse_numeric_term};
pub use sort::{SortValue, collate, compare_students};

/// Field a result set can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Name,
    Email,
    Age,
    Address,
    CreatedAt,
}

impl SortField {
    pub const ALL: [Self; 5] = [Self::Name, Self::Email, Self::Age, Self::Address, Self::CreatedAt];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::Address => "address",
            Self::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| CoreError::InvalidSortField(s.to_owned()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` selects descending order; anything else, including absent or
    /// unknown values, is ascending.
    #[must_use]
    pub fn from_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort descriptor: field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    #[must_use]
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Caller-facing search request, as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl SearchRequest {
    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        SortSpec::new(self.sort_by, self.sort_order)
    }
}

/// Pagination bounds: skip `offset`, then take up to `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    /// Resolves optional bounds; a missing or zero limit uses the default and
    /// anything above the maximum is clamped.
    #[must_use]
    pub fn bounded(offset: Option<usize>, limit: Option<usize>, limits: QueryLimits) -> Self {
        let limit = match limit {
            None | Some(0) => limits.default_limit,
            Some(n) => n.min(limits.max_limit),
        };
        Self { offset: offset.unwrap_or(0), limit }
    }

    #[must_use]
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

/// Compiled server-side query handed to the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentQuery {
    pub filter: StudentFilter,
    pub sort: SortSpec,
    pub page: Page,
}

impl StudentQuery {
    /// Builds the authoritative query: exact age equality, bounded page.
    #[must_use]
    pub fn from_request(request: &SearchRequest, limits: QueryLimits) -> Self {
        Self {
            filter: StudentFilter::new(request.search_term.as_deref(), AgeMatch::Exact),
            sort: request.sort(),
            page: Page::bounded(request.offset, request.limit, limits),
        }
    }
}

/// Filters, sorts and optionally paginates a snapshot of records.
///
/// The sort is stable, so records with equal keys keep their input order.
#[must_use]
pub fn apply(
    records: &[Student],
    filter: &StudentFilter,
    sort: SortSpec,
    page: Option<Page>,
) -> Vec<Student> {
    let mut selected: Vec<Student> =
        records.iter().filter(|student| filter.matches(student)).cloned().collect();
    selected.sort_by(|a, b| compare_students(a, b, sort));
    match page {
        Some(page) => page.slice(selected),
        None => selected,
    }
}
