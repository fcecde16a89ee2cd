use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    DevTask, DualStreamPlanner, MergeReport, PlannerError, QueueStats, ScheduleDay,
    ScheduleSummary, Stream, UniversityTask,
};

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<DualStreamPlanner>>,
}

impl AppState {
    pub fn new(planner: DualStreamPlanner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
        }
    }

    pub fn with_shared(planner: Arc<RwLock<DualStreamPlanner>>) -> Self {
        Self { planner }
    }

    fn planner(&self) -> Arc<RwLock<DualStreamPlanner>> {
        self.planner.clone()
    }

    /// Runs a mutation on the blocking pool. Observers may do file or
    /// database I/O while the write lock is held.
    async fn mutate<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut DualStreamPlanner) -> T + Send + 'static,
        T: Send + 'static,
    {
        let planner = self.planner();
        tokio::task::spawn_blocking(move || f(&mut planner.write()))
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<PlannerError> for ApiError {
    fn from(value: PlannerError) -> Self {
        match value {
            PlannerError::Validation(err) => ApiError::Invalid(err.to_string()),
            PlannerError::DuplicateId(_) => ApiError::Conflict(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct NewUniversityTask {
    #[serde(default)]
    id: Option<String>,
    subject: String,
    topic: String,
    duration: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewDevTask {
    #[serde(default)]
    id: Option<String>,
    project: String,
    tech_stack: Vec<String>,
    complexity: u32,
}

#[derive(Debug, Default, Deserialize)]
struct MergePayload {
    /// Defaults to the server's local date.
    #[serde(default)]
    reference: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueuesBody {
    uni_queue: Vec<UniversityTask>,
    dev_queue: Vec<DevTask>,
}

#[derive(Debug, Serialize)]
struct StatsBody {
    queues: QueueStats,
    schedule: ScheduleSummary,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/queues", get(get_queues))
        .route("/queues/university", post(add_university_task))
        .route("/queues/dev", post(add_dev_task))
        .route("/queues/:stream/:id", delete(remove_task))
        .route("/merge", post(merge_streams))
        .route("/schedule", get(get_schedule))
        .route("/stats", get(get_stats))
        .route("/reset", post(reset_all))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, planner: DualStreamPlanner) -> std::io::Result<()> {
    let state = AppState::new(planner);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "planner HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_queues(State(state): State<AppState>) -> Json<QueuesBody> {
    let planner = state.planner();
    let guard = planner.read();
    Json(QueuesBody {
        uni_queue: guard.uni_queue().to_vec(),
        dev_queue: guard.dev_queue().to_vec(),
    })
}

async fn add_university_task(
    State(state): State<AppState>,
    Json(payload): Json<NewUniversityTask>,
) -> Result<(StatusCode, Json<UniversityTask>), ApiError> {
    let task = match payload.id {
        Some(id) => UniversityTask::with_id(id, payload.subject, payload.topic, payload.duration),
        None => UniversityTask::new(payload.subject, payload.topic, payload.duration),
    };
    let queued = task.clone();
    state
        .mutate(move |planner| planner.add_university_task(queued))
        .await??;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn add_dev_task(
    State(state): State<AppState>,
    Json(payload): Json<NewDevTask>,
) -> Result<(StatusCode, Json<DevTask>), ApiError> {
    let task = match payload.id {
        Some(id) => DevTask::with_id(id, payload.project, payload.tech_stack, payload.complexity),
        None => DevTask::new(payload.project, payload.tech_stack, payload.complexity),
    };
    let queued = task.clone();
    state
        .mutate(move |planner| planner.add_dev_task(queued))
        .await??;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn remove_task(
    State(state): State<AppState>,
    Path((stream, task_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let stream: Stream = stream.parse().map_err(ApiError::invalid)?;
    let id = task_id.clone();
    let removed = state
        .mutate(move |planner| planner.remove_task(&id, stream))
        .await?;
    if !removed {
        return Err(ApiError::not_found(format!(
            "task {task_id} not found in {stream} queue"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn merge_streams(
    State(state): State<AppState>,
    payload: Option<Json<MergePayload>>,
) -> Result<Json<MergeReport>, ApiError> {
    let reference = payload
        .and_then(|Json(payload)| payload.reference)
        .unwrap_or_else(|| Local::now().date_naive());
    let report = state
        .mutate(move |planner| planner.merge(reference))
        .await?;
    Ok(Json(report))
}

async fn get_schedule(State(state): State<AppState>) -> Json<Vec<ScheduleDay>> {
    let planner = state.planner();
    let schedule = planner.read().schedule().to_vec();
    Json(schedule)
}

async fn get_stats(State(state): State<AppState>) -> Json<StatsBody> {
    let planner = state.planner();
    let guard = planner.read();
    Json(StatsBody {
        queues: guard.stats(),
        schedule: ScheduleSummary::from_days(guard.schedule()),
    })
}

async fn reset_all(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.mutate(|planner| planner.reset_all()).await?;
    Ok(StatusCode::NO_CONTENT)
}
