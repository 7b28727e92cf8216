use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use student_records_core::{NewStudent, SearchRequest, Student};

use crate::error::ClientError;

const STUDENT_FIELDS: &str = "id name email age address createdAt updatedAt";

fn students_query() -> String {
    format!(
        "query Students($input: SearchStudentInput) {{ students(input: $input) {{ {STUDENT_FIELDS} }} }}"
    )
}

fn student_query() -> String {
    format!("query Student($id: ID!) {{ student(id: $id) {{ {STUDENT_FIELDS} }} }}")
}

fn create_mutation() -> String {
    format!(
        "mutation CreateStudent($input: NewStudentInput!) {{ createStudent(input: $input) {{ {STUDENT_FIELDS} }} }}"
    )
}

fn update_mutation() -> String {
    format!(
        "mutation UpdateStudent($id: ID!, $input: NewStudentInput!) {{ updateStudent(id: $id, input: $input) {{ {STUDENT_FIELDS} }} }}"
    )
}

const DELETE_MUTATION: &str = "mutation DeleteStudent($id: ID!) { deleteStudent(id: $id) }";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

/// Client for the student records GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct StudentClient {
    client: reqwest::Client,
    endpoint: String,
}

impl StudentClient {
    /// Creates a client for the full GraphQL endpoint URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::ClientInit(e.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// # Errors
    /// Transport failures, GraphQL errors or an unexpected response shape.
    pub async fn list_students(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<Student>, ClientError> {
        self.execute(&students_query(), json!({ "input": request }), "students").await
    }

    /// # Errors
    /// Transport failures, GraphQL errors or an unexpected response shape.
    pub async fn get_student(&self, id: &str) -> Result<Option<Student>, ClientError> {
        self.execute(&student_query(), json!({ "id": id }), "student").await
    }

    /// # Errors
    /// Transport failures, GraphQL errors or an unexpected response shape.
    pub async fn create_student(&self, input: &NewStudent) -> Result<Student, ClientError> {
        self.execute(&create_mutation(), json!({ "input": input }), "createStudent").await
    }

    /// # Errors
    /// Transport failures, GraphQL errors (`NOT_FOUND` for an unknown id) or
    /// an unexpected response shape.
    pub async fn update_student(
        &self,
        id: &str,
        input: &NewStudent,
    ) -> Result<Student, ClientError> {
        self.execute(&update_mutation(), json!({ "id": id, "input": input }), "updateStudent")
            .await
    }

    /// Returns the server's confirmation message.
    ///
    /// # Errors
    /// Transport failures, GraphQL errors (`NOT_FOUND` for an unknown id) or
    /// an unexpected response shape.
    pub async fn delete_student(&self, id: &str) -> Result<String, ClientError> {
        self.execute(DELETE_MUTATION, json!({ "id": id }), "deleteStudent").await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<T, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed: GraphQlResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ClientError::HttpStatus { code: status.as_u16(), body });
            },
            Err(source) => {
                return Err(ClientError::JsonParse { context: field.to_owned(), source });
            },
        };

        if let Some(first) = parsed.errors.into_iter().next() {
            let code = first
                .extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .and_then(Value::as_str)
                .map(str::to_owned);
            tracing::debug!(field, code = ?code, message = %first.message, "GraphQL error");
            return Err(ClientError::GraphQl { message: first.message, code });
        }
        if !status.is_success() {
            return Err(ClientError::HttpStatus { code: status.as_u16(), body });
        }

        let value = parsed
            .data
            .and_then(|mut data| data.get_mut(field).map(Value::take))
            .ok_or_else(|| ClientError::MissingField(field.to_owned()))?;
        serde_json::from_value(value)
            .map_err(|source| ClientError::JsonParse { context: field.to_owned(), source })
    }
}
