//! GraphQL object and input types.

use async_graphql::{ID, InputObject, SimpleObject};
use student_records_core::{
    CoreError, NewStudent, SearchRequest, SortField, SortOrder, Student, timestamp,
};

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Student")]
pub struct StudentObject {
    pub id: ID,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    /// ISO-8601, millisecond precision
    pub created_at: String,
    pub updated_at: String,
}

impl From<Student> for StudentObject {
    fn from(s: Student) -> Self {
        Self {
            id: ID(s.id),
            created_at: timestamp::to_iso(&s.created_at),
            updated_at: timestamp::to_iso(&s.updated_at),
            name: s.name,
            email: s.email,
            age: s.age,
            address: s.address,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "NewStudentInput")]
pub struct NewStudentInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
}

impl From<NewStudentInput> for NewStudent {
    fn from(input: NewStudentInput) -> Self {
        Self { name: input.name, email: input.email, age: input.age, address: input.address }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "SearchStudentInput")]
pub struct SearchStudentInput {
    pub search_term: Option<String>,
    /// name | email | age | address | createdAt
    pub sort_by: Option<String>,
    /// "desc" for descending, anything else ascending
    pub sort_order: Option<String>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl SearchStudentInput {
    /// Unknown `sortBy` and negative bounds are rejected; `sortOrder` is lenient.
    pub fn into_request(self) -> Result<SearchRequest, CoreError> {
        let sort_by = match self.sort_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<SortField>()?,
            None => SortField::default(),
        };
        Ok(SearchRequest {
            sort_order: SortOrder::from_lenient(self.sort_order.as_deref()),
            limit: non_negative("limit", self.limit)?,
            offset: non_negative("offset", self.offset)?,
            search_term: self.search_term,
            sort_by,
        })
    }
}

fn non_negative(field: &str, value: Option<i32>) -> Result<Option<usize>, CoreError> {
    value
        .map(|n| {
            usize::try_from(n)
                .map_err(|_| CoreError::InvalidInput(format!("{field} must not be negative")))
        })
        .transpose()
}
