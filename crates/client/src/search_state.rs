//! Presentation-side search and sort state.
//!
//! Mirrors the server's filter and ordering over a list already held by the
//! client. Age is matched as a substring of its decimal form here, so this
//! view can be a superset of what the server returns for numeric terms.

use student_records_core::{
    AgeMatch, SearchRequest, SortField, SortOrder, SortSpec, Student, StudentFilter, query,
};

/// Sort choices offered to the user, in display order.
pub const SORT_OPTIONS: [(SortField, &str); 5] = [
    (SortField::Name, "Name"),
    (SortField::Email, "Email"),
    (SortField::Age, "Age"),
    (SortField::Address, "Address"),
    (SortField::CreatedAt, "Created"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStats {
    pub total: usize,
    pub filtered: usize,
    pub has_search: bool,
    pub search_term: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// What the user is typing
    search_term: String,
    /// Last value that survived the debounce
    settled_term: String,
    sort: SortSpec,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Records the debounced term; filtering and stats use this one.
    pub fn settle(&mut self, term: impl Into<String>) {
        self.settled_term = term.into();
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn settled_term(&self) -> &str {
        &self.settled_term
    }

    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Re-selecting the current field while ascending switches to
    /// descending; any other selection sorts ascending.
    pub fn handle_sort_change(&mut self, field: SortField) -> SortSpec {
        let order = if self.sort.field == field && self.sort.order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        self.sort = SortSpec::new(field, order);
        self.sort
    }

    pub fn toggle_sort_order(&mut self) -> SortSpec {
        self.sort.order = self.sort.order.toggled();
        self.sort
    }

    fn filter(&self) -> StudentFilter {
        StudentFilter::new(Some(&self.settled_term), AgeMatch::Substring)
    }

    /// Filtered and sorted copy of `records`.
    #[must_use]
    pub fn view(&self, records: &[Student]) -> Vec<Student> {
        query::apply(records, &self.filter(), self.sort, None)
    }

    #[must_use]
    pub fn stats(&self, records: &[Student]) -> SearchStats {
        let filter = self.filter();
        SearchStats {
            total: records.len(),
            filtered: records.iter().filter(|s| filter.matches(s)).count(),
            has_search: !filter.is_match_all(),
            search_term: self.settled_term.clone(),
        }
    }

    /// Server request for the settled term and current sort.
    #[must_use]
    pub fn request(&self, limit: usize, offset: usize) -> SearchRequest {
        let term = self.settled_term.trim();
        SearchRequest {
            search_term: (!term.is_empty()).then(|| term.to_owned()),
            sort_by: self.sort.field,
            sort_order: self.sort.order,
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}
