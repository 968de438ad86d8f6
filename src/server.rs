// 🌐 HTTP API - REST surface over the scoring pipeline
//
// Every request re-runs the pipeline against the configured source; the
// result depends only on the file contents.

use crate::error::PipelineError;
use crate::pipeline::{run_file, RunOptions};
use crate::report::{Report, ReportEntry};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    input: Arc<PathBuf>,
    options: Arc<RunOptions>,
}

impl AppState {
    pub fn new(input: PathBuf, options: RunOptions) -> Self {
        AppState {
            input: Arc::new(input),
            options: Arc::new(options),
        }
    }

    fn report(&self) -> Result<Report, PipelineError> {
        run_file(&*self.input, &self.options)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

fn pipeline_error(err: PipelineError) -> Response {
    if err.is_source_not_found() {
        error_response(StatusCode::NOT_FOUND, err.to_string())
    } else {
        tracing::error!("pipeline failed: {}", err);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/report - Full report as JSON
async fn get_report(State(state): State<AppState>) -> Response {
    match state.report() {
        Ok(report) => ApiResponse::ok(report),
        Err(e) => pipeline_error(e),
    }
}

/// GET /api/report.txt - Canonical text report
async fn get_report_text(State(state): State<AppState>) -> Response {
    match state.report() {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.render_text(),
        )
            .into_response(),
        Err(e) => pipeline_error(e),
    }
}

/// People listing row with a link to the per-person endpoint
#[derive(Serialize)]
struct PersonLink {
    name: String,
    grade: &'static str,
    url: String,
}

/// GET /api/people - Names in listing order
async fn list_people(State(state): State<AppState>) -> Response {
    match state.report() {
        Ok(report) => {
            let people: Vec<PersonLink> = report
                .people
                .iter()
                .map(|e| PersonLink {
                    name: e.name.clone(),
                    grade: e.grade.label(),
                    url: format!("/api/people/{}", urlencoding::encode(&e.name)),
                })
                .collect();
            ApiResponse::ok(people)
        }
        Err(e) => pipeline_error(e),
    }
}

/// GET /api/people/:name - One person's result (path is already percent-decoded)
async fn get_person(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.report() {
        Ok(report) => match report.get(&name) {
            Some(entry) => ApiResponse::ok(entry.clone()),
            None => error_response(StatusCode::NOT_FOUND, format!("unknown person: {}", name)),
        },
        Err(e) => pipeline_error(e),
    }
}

/// GET /api/removed - Removal-eligible people
async fn get_removed(State(state): State<AppState>) -> Response {
    match state.report() {
        Ok(report) => {
            let removed: Vec<ReportEntry> = report.removed().cloned().collect();
            ApiResponse::ok(removed)
        }
        Err(e) => pipeline_error(e),
    }
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/report", get(get_report))
        .route("/report.txt", get(get_report_text))
        .route("/people", get(list_people))
        .route("/people/:name", get(get_person))
        .route("/removed", get(get_removed))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
