//! Record comparator: nulls last, then direction.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::{SortField, SortOrder, SortSpec};
use crate::student::Student;
use crate::timestamp;

/// A present sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(i64),
    Instant(DateTime<Utc>),
}

impl SortValue<'_> {
    /// Same-kind values compare naturally; mixed kinds fall back to comparing
    /// their string forms.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => collate(a, b),
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (a, b) => collate(&a.to_text(), &b.to_text()),
        }
    }

    fn to_text(self) -> String {
        match self {
            Self::Text(s) => s.to_owned(),
            Self::Number(n) => n.to_string(),
            Self::Instant(ts) => timestamp::to_iso(&ts),
        }
    }
}

impl SortField {
    /// Sort key of `student` for this field; `None` when the field is absent.
    #[must_use]
    pub fn value_of(self, student: &Student) -> Option<SortValue<'_>> {
        match self {
            Self::Name => student.name.as_deref().map(SortValue::Text),
            Self::Email => student.email.as_deref().map(SortValue::Text),
            Self::Address => student.address.as_deref().map(SortValue::Text),
            Self::Age => student.age.map(|age| SortValue::Number(i64::from(age))),
            Self::CreatedAt => Some(SortValue::Instant(student.created_at)),
        }
    }
}

/// Compares two records under `spec`.
///
/// Absent keys trail in both directions: the null rule is decided before the
/// direction is applied, so only present-vs-present results are reversed.
#[must_use]
pub fn compare_students(a: &Student, b: &Student, spec: SortSpec) -> Ordering {
    match (spec.field.value_of(a), spec.field.value_of(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering = x.compare(&y);
            match spec.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        },
    }
}

/// Locale-style string comparison: accents and case are ignored at the
/// primary level, the raw strings break ties.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}
