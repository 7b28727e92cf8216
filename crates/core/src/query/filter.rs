//! Search predicate over student records.

use crate::student::Student;

/// How a search term is matched against `age`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeMatch {
    /// Numeric terms match `age` by equality (authoritative server behaviour).
    #[default]
    Exact,
    /// The decimal form of `age` is matched as a substring (client mirror).
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchTerm {
    text: String,
    folded: String,
    numeric: Option<i32>,
}

/// Case-insensitive OR-predicate over `name`, `email`, `address` and `age`.
///
/// A missing or blank term matches every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentFilter {
    term: Option<SearchTerm>,
    age_match: AgeMatch,
}

impl StudentFilter {
    #[must_use]
    pub fn new(term: Option<&str>, age_match: AgeMatch) -> Self {
        let term = term.map(str::trim).filter(|t| !t.is_empty()).map(|t| SearchTerm {
            text: t.to_owned(),
            folded: t.to_lowercase(),
            numeric: parse_numeric_term(t),
        });
        Self { term, age_match }
    }

    /// Predicate that matches every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_match_all(&self) -> bool {
        self.term.is_none()
    }

    /// Trimmed search term, if any.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_ref().map(|t| t.text.as_str())
    }

    /// Age the predicate compares for equality, only under [`AgeMatch::Exact`].
    #[must_use]
    pub fn age_equals(&self) -> Option<i32> {
        match self.age_match {
            AgeMatch::Exact => self.term.as_ref().and_then(|t| t.numeric),
            AgeMatch::Substring => None,
        }
    }

    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        let text_hit = [&student.name, &student.email, &student.address]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&term.folded));
        if text_hit {
            return true;
        }
        match (self.age_match, student.age) {
            (AgeMatch::Exact, Some(age)) => term.numeric == Some(age),
            (AgeMatch::Substring, Some(age)) => age.to_string().contains(&term.folded),
            (_, None) => false,
        }
    }
}

/// Interprets a term as a number the way a numeric age search does: it must
/// parse as a finite number with an integral value that fits an `i32`.
#[must_use]
pub fn parse_numeric_term(term: &str) -> Option<i32> {
    let value: f64 = term.trim().parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, reason = "integral and range-checked above")]
    let age = value as i32;
    Some(age)
}
