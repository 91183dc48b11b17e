use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{
    ApplyRequest, IssueSubmission, JobCompletion, JobDraft, ProfileUpdate, Registration, UserId,
};
use super::repository::MarketplaceRepository;
use super::service::{MarketplaceError, MarketplaceService};

/// Header carrying the caller's user id. Session handling lives in front of this service.
pub const ACTOR_HEADER: &str = "x-user-id";

type SharedService<R> = Arc<MarketplaceService<R>>;

/// Router builder exposing the worker and employer endpoints.
pub fn marketplace_router<R>(service: Arc<MarketplaceService<R>>) -> Router
where
    R: MarketplaceRepository + 'static,
{
    Router::new()
        .route("/api/v1/register", post(register_handler::<R>))
        .route("/api/v1/worker/dashboard", get(worker_dashboard_handler::<R>))
        .route("/api/v1/worker/score", get(score_handler::<R>))
        .route("/api/v1/worker/profile", post(update_profile_handler::<R>))
        .route(
            "/api/v1/worker/availability",
            post(toggle_availability_handler::<R>),
        )
        .route("/api/v1/worker/issues", post(report_issue_handler::<R>))
        .route("/api/v1/worker/applications", post(apply_handler::<R>))
        .route(
            "/api/v1/employer/dashboard",
            get(employer_dashboard_handler::<R>),
        )
        .route("/api/v1/employer/jobs", post(post_job_handler::<R>))
        .route(
            "/api/v1/employer/completions",
            post(complete_job_handler::<R>),
        )
        .route(
            "/api/v1/employer/workers/search",
            get(search_workers_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub(crate) skill: Option<String>,
}

pub(crate) fn actor_id(headers: &HeaderMap) -> Result<UserId, MarketplaceError> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
        .ok_or(MarketplaceError::Unauthenticated)
}

fn error_response(error: MarketplaceError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        warn!(%error, "marketplace request failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T>(status: StatusCode, result: Result<T, MarketplaceError>) -> Response
where
    T: serde::Serialize,
{
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_handler<R>(
    State(service): State<SharedService<R>>,
    Json(registration): Json<Registration>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    respond(StatusCode::CREATED, service.register(registration))
}

pub(crate) async fn worker_dashboard_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers).and_then(|id| service.worker_dashboard(&id, Utc::now()));
    respond(StatusCode::OK, result)
}

pub(crate) async fn score_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers).and_then(|id| service.score_details(&id));
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_profile_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers).and_then(|id| service.update_profile(&id, update));
    respond(StatusCode::OK, result)
}

pub(crate) async fn toggle_availability_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers)
        .and_then(|id| service.toggle_availability(&id))
        .map(|available| json!({ "availability_status": available }));
    respond(StatusCode::OK, result)
}

pub(crate) async fn report_issue_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    Json(submission): Json<IssueSubmission>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result =
        actor_id(&headers).and_then(|id| service.report_issue(&id, submission, Utc::now()));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn apply_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers).and_then(|id| service.apply(&id, &request.job_id, Utc::now()));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn employer_dashboard_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers).and_then(|id| service.employer_dashboard(&id));
    respond(StatusCode::OK, result)
}

pub(crate) async fn post_job_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result = actor_id(&headers).and_then(|id| service.post_job(&id, draft, Utc::now()));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn complete_job_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    Json(completion): Json<JobCompletion>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result =
        actor_id(&headers).and_then(|id| service.complete_job(&id, completion, Utc::now()));
    respond(StatusCode::OK, result)
}

pub(crate) async fn search_workers_handler<R>(
    State(service): State<SharedService<R>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: MarketplaceRepository + 'static,
{
    let result =
        actor_id(&headers).and_then(|id| service.search_workers(&id, params.skill.as_deref()));
    respond(StatusCode::OK, result)
}
