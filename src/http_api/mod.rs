use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    AnalysisConfig, CpmAnalyzer, GeneratorParams, Schedule, WorkflowError, WorkflowGenerator,
    WorkflowGraph, persistence::WorkflowDocument,
};

#[derive(Clone, Default)]
pub struct AppState {
    workflow: Arc<RwLock<Option<WorkflowGraph>>>,
}

impl AppState {
    pub fn new(workflow: Option<WorkflowGraph>) -> Self {
        Self {
            workflow: Arc::new(RwLock::new(workflow)),
        }
    }

    pub fn with_shared(workflow: Arc<RwLock<Option<WorkflowGraph>>>) -> Self {
        Self { workflow }
    }

    fn workflow(&self) -> Arc<RwLock<Option<WorkflowGraph>>> {
        self.workflow.clone()
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
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn no_workflow() -> Self {
        ApiError::NotFound("no workflow loaded".to_string())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        if status.is_server_error() {
            warn!(%message, "request failed");
        }
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub params: GeneratorParams,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub seed: u64,
    pub workflow: WorkflowDocument,
}

#[derive(Debug, Deserialize)]
pub struct SweepRequest {
    pub rates: Vec<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/workflow", get(get_workflow).put(put_workflow))
        .route("/workflow/generate", post(generate_workflow))
        .route("/analyze", post(analyze))
        .route("/analyze/sweep", post(sweep))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, workflow: Option<WorkflowGraph>) -> std::io::Result<()> {
    let app = router(AppState::new(workflow));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_workflow(State(state): State<AppState>) -> Result<Json<WorkflowDocument>, ApiError> {
    let workflow = state.workflow();
    let guard = workflow.read();
    let graph = guard.as_ref().ok_or_else(ApiError::no_workflow)?;
    Ok(Json(WorkflowDocument::from_graph(graph)))
}

async fn put_workflow(
    State(state): State<AppState>,
    Json(document): Json<WorkflowDocument>,
) -> Result<Json<WorkflowDocument>, ApiError> {
    let graph = document.into_graph()?;
    let stored = WorkflowDocument::from_graph(&graph);
    *state.workflow.write() = Some(graph);
    Ok(Json(stored))
}

async fn generate_workflow(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), ApiError> {
    let mut generator = match request.seed {
        Some(seed) => WorkflowGenerator::with_seed(seed),
        None => WorkflowGenerator::new(),
    };
    let graph = generator.generate(&request.params)?;
    let response = GenerateResponse {
        seed: generator.seed(),
        workflow: WorkflowDocument::from_graph(&graph),
    };
    *state.workflow.write() = Some(graph);
    Ok((StatusCode::CREATED, Json(response)))
}

async fn analyze(
    State(state): State<AppState>,
    Json(config): Json<AnalysisConfig>,
) -> Result<Json<Schedule>, ApiError> {
    let workflow = state.workflow();
    let schedule = {
        let guard = workflow.read();
        let graph = guard.as_ref().ok_or_else(ApiError::no_workflow)?;
        CpmAnalyzer::with_cost_model(graph, config.cost_model()).analyze()?
    };
    Ok(Json(schedule))
}

async fn sweep(
    State(state): State<AppState>,
    Json(request): Json<SweepRequest>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    if request.rates.is_empty() {
        return Err(ApiError::Invalid("rates must not be empty".to_string()));
    }
    let graph = state
        .workflow
        .read()
        .clone()
        .ok_or_else(ApiError::no_workflow)?;
    // the sweep fans out on rayon; keep it off the async workers
    let schedules = tokio::task::spawn_blocking(move || {
        CpmAnalyzer::sweep_transfer_rates(&graph, &request.rates)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("sweep task failed: {err}")))??;
    Ok(Json(schedules))
}
