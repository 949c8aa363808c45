//! HTTP routes for the daemon
//!
//! Two endpoints carry the whole surface:
//!
//! - `POST /v1/sync/users`: execute one reconciliation run and return
//!   its summary
//! - `GET /v1/users`: passthrough read of the local store, no
//!   reconciliation logic
//!
//! Plus the usual `/healthz` liveness probe.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use usync_core::{SyncEngine, SyncSummary, UserRecord};

use crate::error::AppError;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SyncEngine>,
}

/// Build the daemon router
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/sync/users", post(sync_users))
        .route("/v1/users", get(list_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Flat external representation of a local user
#[derive(Debug, Serialize)]
struct LocalUser {
    id: i64,
    username: String,
    full_name: String,
    email: String,
    city: String,
}

impl From<&UserRecord> for LocalUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id().0,
            username: record.username().to_string(),
            full_name: record.full_name().to_string(),
            email: record.email().as_str().to_string(),
            city: record.city().to_string(),
        }
    }
}

/// Trigger one reconciliation run
///
/// The caller always receives either a complete summary or a
/// fetch-stage failure; never a partial summary.
async fn sync_users(State(state): State<AppState>) -> Result<Json<SyncSummary>, AppError> {
    let summary = state.engine.run_once().await?;
    Ok(Json(summary))
}

/// List the locally persisted users
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<LocalUser>>, AppError> {
    let records = state.engine.store().fetch_all().await?;
    Ok(Json(records.iter().map(LocalUser::from).collect()))
}
