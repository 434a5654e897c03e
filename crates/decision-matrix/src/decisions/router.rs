use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{DecisionDraft, DecisionId, DecisionUpdate};
use super::repository::{DecisionRepository, RepositoryError};
use super::service::{DecisionService, ServiceError};

/// Router builder exposing HTTP endpoints for decision CRUD and evaluation.
pub fn decision_router<R>(service: Arc<DecisionService<R>>) -> Router
where
    R: DecisionRepository + 'static,
{
    Router::new()
        .route(
            "/api/decisions",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/decisions/:decision_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/decisions/:decision_id/evaluate",
            post(evaluate_handler::<R>),
        )
        .with_state(service)
}

/// Envelope shared by every successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, axum::Json(Envelope::ok(data))).into_response()
}

fn envelope_error(status: StatusCode, message: String) -> Response {
    envelope_error(status, message)
}

/// Malformed or incomplete request bodies keep the failure envelope.
fn rejected(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "decision payload rejected");
    envelope_error(rejection.status(), rejection.body_text())
}

fn failure(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = match &error {
        ServiceError::Repository(RepositoryError::NotFound) => "Decision not found".to_string(),
        other => other.to_string(),
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "decision request failed");
    }

    envelope_error(status, message)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    payload: Result<axum::Json<DecisionDraft>, JsonRejection>,
) -> Response
where
    R: DecisionRepository + 'static,
{
    let axum::Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };

    match service.create(draft) {
        Ok(decision) => success(StatusCode::CREATED, decision),
        Err(error) => failure(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<DecisionService<R>>>) -> Response
where
    R: DecisionRepository + 'static,
{
    match service.list() {
        Ok(summaries) => success(StatusCode::OK, summaries),
        Err(error) => failure(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    Path(decision_id): Path<String>,
) -> Response
where
    R: DecisionRepository + 'static,
{
    match service.get(&DecisionId(decision_id)) {
        Ok(decision) => success(StatusCode::OK, decision),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    Path(decision_id): Path<String>,
    payload: Result<axum::Json<DecisionUpdate>, JsonRejection>,
) -> Response
where
    R: DecisionRepository + 'static,
{
    let axum::Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };

    match service.update(&DecisionId(decision_id), update) {
        Ok(decision) => success(StatusCode::OK, decision),
        Err(error) => failure(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    Path(decision_id): Path<String>,
) -> Response
where
    R: DecisionRepository + 'static,
{
    match service.delete(&DecisionId(decision_id)) {
        Ok(decision) => success(StatusCode::OK, decision),
        Err(error) => failure(error),
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    Path(decision_id): Path<String>,
) -> Response
where
    R: DecisionRepository + 'static,
{
    match service.evaluate(&DecisionId(decision_id)) {
        Ok(result) => success(StatusCode::OK, result),
        Err(error) => failure(error),
    }
}
