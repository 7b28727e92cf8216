//! Query and mutation resolvers.
//!
//! Resolvers read the [`StudentService`] from the schema data and map every
//! failure through [`ApiError`].

use async_graphql::{Context, EmptySubscription, ID, Object, Schema};
use student_records_service::StudentService;

use crate::api_error::ApiError;
use crate::graphql_types::{NewStudentInput, SearchStudentInput, StudentObject};

pub type StudentSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[must_use]
pub fn build_schema(service: StudentService) -> StudentSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).data(service).finish()
}

#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Filtered, sorted page of students.
    async fn students(
        &self,
        ctx: &Context<'_>,
        input: Option<SearchStudentInput>,
    ) -> async_graphql::Result<Vec<StudentObject>> {
        let service = ctx.data::<StudentService>()?;
        let request = input
            .unwrap_or_default()
            .into_request()
            .map_err(|e| ApiError::from(e).into_graphql())?;
        let students = service
            .list_students(&request)
            .await
            .map_err(|e| ApiError::from_service(e, "Failed to fetch students").into_graphql())?;
        Ok(students.into_iter().map(StudentObject::from).collect())
    }

    async fn student(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<StudentObject>> {
        let service = ctx.data::<StudentService>()?;
        let student = service
            .get_student(&id)
            .await
            .map_err(|e| ApiError::from_service(e, "Failed to fetch student").into_graphql())?;
        Ok(student.map(StudentObject::from))
    }
}

#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_student(
        &self,
        ctx: &Context<'_>,
        input: NewStudentInput,
    ) -> async_graphql::Result<StudentObject> {
        let service = ctx.data::<StudentService>()?;
        let student = service
            .create_student(&input.into())
            .await
            .map_err(|e| ApiError::from_service(e, "Failed to create student").into_graphql())?;
        Ok(student.into())
    }

    async fn update_student(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: NewStudentInput,
    ) -> async_graphql::Result<StudentObject> {
        let service = ctx.data::<StudentService>()?;
        let student = service
            .update_student(&id, &input.into())
            .await
            .map_err(|e| ApiError::from_service(e, "Failed to update student").into_graphql())?;
        Ok(student.into())
    }

    /// Returns a confirmation message.
    async fn delete_student(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<String> {
        let service = ctx.data::<StudentService>()?;
        service
            .delete_student(&id)
            .await
            .map_err(|e| ApiError::from_service(e, "Failed to delete student").into_graphql())
    }
}
