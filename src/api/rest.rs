//! REST API Handlers
//!
//! Implements the REST endpoints for onboarding candidate queries, health
//! and metrics.

use crate::error::Error;
use crate::onboarding::{EligibilityReport, OnboardingService};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Candidate listing request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCandidatesRequest {
    /// File systems onboarded earlier in the caller's session, not yet
    /// visible in the shared-storage settings
    #[serde(default)]
    pub just_onboarded: Vec<String>,
}

/// Candidate listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCandidatesResponse {
    pub resolved_at: DateTime<Utc>,
    pub report: EligibilityReport,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// =============================================================================
// REST Router
// =============================================================================

/// REST API router builder
pub struct RestRouter {
    service: Arc<OnboardingService>,
}

impl RestRouter {
    /// Create a new REST router
    pub fn new(service: Arc<OnboardingService>) -> Self {
        Self { service }
    }

    /// Build the Axum router
    pub fn build(self) -> Router {
        let state = AppState {
            service: self.service,
        };

        Router::new()
            // Onboarding endpoints
            .route(
                "/v1/onboarding/candidates",
                get(list_candidates).post(list_candidates_after_session),
            )
            // Operational endpoints
            .route("/metrics", get(metrics))
            .route("/health", get(health_check))
            .route("/ready", get(readiness_check))
            .with_state(state)
    }
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    service: Arc<OnboardingService>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List candidates using only the persisted shared-storage settings
async fn list_candidates(State(state): State<AppState>) -> Response {
    resolve(&state, &[]).await
}

/// List candidates, also leaving out file systems onboarded this session
async fn list_candidates_after_session(
    State(state): State<AppState>,
    Json(request): Json<ListCandidatesRequest>,
) -> Response {
    if let Err(e) = validate_ids(&request.just_onboarded) {
        return error_response(&e);
    }
    resolve(&state, &request.just_onboarded).await
}

async fn resolve(state: &AppState, just_onboarded: &[String]) -> Response {
    info!(
        "Listing onboarding candidates ({} onboarded this session)",
        just_onboarded.len()
    );

    match state
        .service
        .list_file_systems_for_onboard(just_onboarded)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ListCandidatesResponse {
                resolved_at: Utc::now(),
                report,
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.service.metrics().encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_ids(ids: &[String]) -> Result<(), Error> {
    match ids
        .iter()
        .find(|id| id.trim().is_empty() || id.chars().any(char::is_whitespace))
    {
        Some(bad) => Err(Error::ApiValidation(format!(
            "invalid file system id: {:?}",
            bad
        ))),
        None => Ok(()),
    }
}

fn error_response(e: &Error) -> Response {
    let (status, code) = match e {
        Error::ApiValidation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        Error::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
        e if e.is_upstream() => (StatusCode::BAD_GATEWAY, "upstream_error"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    }

    (
        status,
        Json(ApiErrorResponse {
            error: code.to_string(),
            message: e.to_string(),
            details: e.is_transient().then(|| "retry may succeed".to_string()),
        }),
    )
        .into_response()
}
