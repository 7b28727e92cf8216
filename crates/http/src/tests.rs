use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use student_records_core::QueryLimits;
use student_records_service::StudentService;
use student_records_storage::{StorageBackend, StudentStore};
use tower::util::ServiceExt;

use crate::{AppState, create_router};

struct Harness {
    router: Router,
    state: Arc<AppState>,
}

impl Harness {
    fn setup() -> Self {
        let service =
            StudentService::new(Arc::new(StorageBackend::new_memory()), QueryLimits::default());
        let state = Arc::new(AppState::new(service));
        Self { router: create_router(Arc::clone(&state)), state }
    }

    async fn graphql(&self, query: &str, variables: Value) -> Value {
        let body = json!({"query": query, "variables": variables});
        let request = Request::builder()
            .method("POST")
            .uri("/api/graphql")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("json body")))
            .expect("graphql request");
        let response = self.router.clone().oneshot(request).await.expect("graphql response");
        assert_eq!(response.status(), StatusCode::OK);
        decode_json(response).await
    }

    async fn get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("get request");
        self.router.clone().oneshot(request).await.expect("get response")
    }

    async fn create(&self, name: &str, age: i32) -> Value {
        let out = self
            .graphql(
                CREATE,
                json!({"input": {
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "age": age,
                    "address": "Semarang",
                }}),
            )
            .await;
        out["data"]["createStudent"].clone()
    }
}

async fn decode_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body bytes");
    serde_json::from_slice(&bytes).expect("decode json")
}

const CREATE: &str = "mutation($input: NewStudentInput!) {
    createStudent(input: $input) { id name age createdAt updatedAt }
}";

const LIST: &str = "query($input: SearchStudentInput) {
    students(input: $input) { id name age }
}";

fn error_code(out: &Value) -> &str {
    out["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn create_returns_iso_timestamps() {
    let harness = Harness::setup();
    let created = harness.create("Ana", 20).await;
    assert_eq!(created["name"], "Ana");
    let created_at = created["createdAt"].as_str().expect("createdAt");
    assert!(created_at.ends_with('Z') && created_at.contains('T'), "{created_at}");
    assert_eq!(created["createdAt"], created["updatedAt"]);
}

#[tokio::test]
async fn students_sorts_and_filters() {
    let harness = Harness::setup();
    for (name, age) in [("Budi", 25), ("Ana", 20), ("Dewi", 125)] {
        harness.create(name, age).await;
    }

    let out = harness.graphql(LIST, json!({"input": {"sortBy": "age", "sortOrder": "desc"}})).await;
    let names: Vec<_> = out["data"]["students"]
        .as_array()
        .expect("students")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Dewi", "Budi", "Ana"]);

    let out = harness.graphql(LIST, json!({"input": {"searchTerm": "25"}})).await;
    let students = out["data"]["students"].as_array().expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["name"], "Budi");
}

#[tokio::test]
async fn students_without_input_uses_defaults() {
    let harness = Harness::setup();
    harness.create("Cici", 19).await;
    harness.create("Ana", 20).await;
    let out = harness.graphql("{ students { name } }", json!({})).await;
    assert_eq!(out["data"]["students"], json!([{"name": "Ana"}, {"name": "Cici"}]));
}

#[tokio::test]
async fn unknown_sort_field_is_bad_user_input() {
    let harness = Harness::setup();
    let out = harness.graphql(LIST, json!({"input": {"sortBy": "password"}})).await;
    assert_eq!(error_code(&out), "BAD_USER_INPUT");
}

#[tokio::test]
async fn create_with_missing_fields_is_bad_user_input() {
    let harness = Harness::setup();
    let out = harness.graphql(CREATE, json!({"input": {"name": "Ana"}})).await;
    assert_eq!(error_code(&out), "BAD_USER_INPUT");
    assert!(out["errors"][0]["message"].as_str().unwrap_or_default().contains("email"));
}

#[tokio::test]
async fn update_and_delete_missing_are_not_found() {
    let harness = Harness::setup();
    let update = "mutation { updateStudent(id: \"missing\", input: {age: 30}) { id } }";
    let out = harness.graphql(update, json!({})).await;
    assert_eq!(error_code(&out), "NOT_FOUND");
    assert_eq!(out["errors"][0]["message"], "Student not found");

    let out = harness.graphql("mutation { deleteStudent(id: \"missing\") }", json!({})).await;
    assert_eq!(error_code(&out), "NOT_FOUND");
}

#[tokio::test]
async fn update_then_delete_round() {
    let harness = Harness::setup();
    let created = harness.create("Eko", 31).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let update = "mutation($id: ID!) {
        updateStudent(id: $id, input: {address: \"Malang\"}) { name address createdAt }
    }";
    let out = harness.graphql(update, json!({"id": id})).await;
    let updated = &out["data"]["updateStudent"];
    assert_eq!(updated["address"], "Malang");
    assert_eq!(updated["name"], "Eko");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let out =
        harness.graphql("mutation($id: ID!) { deleteStudent(id: $id) }", json!({"id": id})).await;
    assert_eq!(out["data"]["deleteStudent"], "Student deleted successfully");

    let out =
        harness.graphql("query($id: ID!) { student(id: $id) { id } }", json!({"id": id})).await;
    assert_eq!(out["data"]["student"], Value::Null);
}

#[tokio::test]
async fn storage_failure_is_opaque_internal_error() {
    let harness = Harness::setup();
    harness.state.service.storage().close().await;
    let out = harness.graphql(LIST, json!({})).await;
    assert_eq!(error_code(&out), "INTERNAL");
    assert_eq!(out["errors"][0]["message"], "Failed to fetch students");
}

#[tokio::test]
async fn readiness_reflects_storage_health() {
    let harness = Harness::setup();
    let response = harness.get("/api/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = decode_json(response).await;
    assert_eq!(body["backend"], "memory");

    harness.state.service.storage().close().await;
    let response = harness.get("/api/readiness").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(decode_json(response).await["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn health_version_and_graphiql() {
    let harness = Harness::setup();
    assert_eq!(harness.get("/health").await.status(), StatusCode::OK);
    let version = decode_json(harness.get("/api/version").await).await;
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(harness.get("/api/graphql").await.status(), StatusCode::OK);
}
