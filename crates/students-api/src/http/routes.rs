//! HTTP route definitions and handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use students_storage::{Student, StudentStore};

use super::response::{ApiError, ApiResult, STATUS_OK};
use super::state::AppState;
use crate::validation::StudentPayload;

/// Default request body size limit (1MB).
/// This prevents memory exhaustion from oversized payloads.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// JSON extractor with the error contract the handlers need:
/// an empty body maps to exactly "empty body", and decode failures
/// surface the decoder's message, both as 400s in the error envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        if bytes.is_empty() {
            error!("error decoding JSON: request body is empty");
            return Err(ApiError::bad_request("empty body"));
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            error!("error decoding JSON: {}", e);
            ApiError::bad_request(e.to_string())
        })?;

        Ok(JsonBody(value))
    }
}

/// Private helper for the student CRUD routes.
fn api_routes<S: StudentStore>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route(
            "/api/students",
            post(create_student::<S>).get(get_students::<S>),
        )
        .route(
            "/api/students/:id",
            get(get_student_by_id::<S>)
                .put(update_student_by_id::<S>)
                .patch(update_student_by_id::<S>)
                .delete(delete_student_by_id::<S>),
        )
}

/// Creates the HTTP router with all student endpoints.
///
/// Applies the default body size limit (1MB) to protect against
/// oversized payloads.
pub fn create_router<S: StudentStore>(state: AppState<S>) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
pub fn create_router_with_body_limit<S: StudentStore>(
    state: AppState<S>,
    body_limit: usize,
) -> Router {
    let shared_state = Arc::new(state);
    api_routes::<S>()
        .route("/health", get(health_check))
        .with_state(shared_state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

// ============================================================
// Handlers
// ============================================================

/// Response body for create and delete: just the affected id.
#[derive(Debug, Serialize)]
struct StudentIdResponse {
    id: i64,
}

/// Parses the path id segment.
///
/// An empty segment is "id is required"; anything that is not a valid
/// i64 surfaces the parser's message. Both are 400s.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() {
        error!("id is empty");
        return Err(ApiError::bad_request("id is required"));
    }
    raw.parse::<i64>().map_err(|e| {
        error!("failed to parse id {:?}: {}", raw, e);
        ApiError::bad_request(e.to_string())
    })
}

async fn create_student<S: StudentStore>(
    State(state): State<Arc<AppState<S>>>,
    JsonBody(payload): JsonBody<StudentPayload>,
) -> ApiResult<impl IntoResponse> {
    let violations = payload.validate();
    if !violations.is_empty() {
        error!("invalid create payload: {} violation(s)", violations.len());
        return Err(ApiError::validation(&violations));
    }

    info!("creating a student");
    let id = state
        .storage
        .create_student(&payload.name, &payload.email, payload.age)
        .await?;
    info!(id, "student created");

    Ok((StatusCode::CREATED, Json(StudentIdResponse { id })))
}

async fn get_student_by_id<S: StudentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    info!(id, "getting a student");
    let student = state.storage.get_student_by_id(id).await?;

    Ok(Json(student))
}

async fn get_students<S: StudentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<impl IntoResponse> {
    info!("getting all students");
    let students = state.storage.get_students().await?;

    Ok(Json(students))
}

async fn update_student_by_id<S: StudentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<StudentPayload>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    let violations = payload.validate();
    if !violations.is_empty() {
        error!("invalid update payload: {} violation(s)", violations.len());
        return Err(ApiError::validation(&violations));
    }

    info!(id, "updating a student");
    let mut student = state
        .storage
        .update_student_by_id(
            id,
            Student {
                id,
                name: payload.name,
                email: payload.email,
                age: payload.age,
            },
        )
        .await?;

    // The path id always wins over whatever id the body carried, so a
    // client cannot reassign a record's identity through the payload.
    student.id = id;

    Ok(Json(student))
}

async fn delete_student_by_id<S: StudentStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    info!(id, "deleting a student");
    let id = state.storage.delete_student_by_id(id).await?;

    Ok(Json(StudentIdResponse { id }))
}

/// Liveness probe; reports only that the process is serving.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": STATUS_OK }))
}
