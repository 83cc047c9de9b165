use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::store::models::{LegacyLogEntry, ResourceLogEntry};

use super::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/logs", get(list_legacy))
        .route(
            "/api/resources/{id}/logs",
            get(list_for_resource).post(append),
        )
        .with_state(state)
}

#[derive(Deserialize)]
struct AppendLogRequest {
    action: String,
    #[serde(default)]
    note: String,
}

#[derive(Serialize)]
struct AppendLogResponse {
    id: i64,
}

/// Legacy flat log, newest first.
async fn list_legacy(
    State(state): State<AppState>,
) -> Result<Json<Vec<LegacyLogEntry>>, ServiceError> {
    Ok(Json(state.service.list_legacy_logs().await?))
}

/// Structured log for one resource, oldest first. Display order is the
/// client's concern.
async fn list_for_resource(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ResourceLogEntry>>, ServiceError> {
    Ok(Json(state.service.list_resource_logs(id).await?))
}

async fn append(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<AppendLogRequest>,
) -> Result<(StatusCode, Json<AppendLogResponse>), ServiceError> {
    let entry_id = state
        .service
        .add_resource_log(id, &body.action, &body.note)
        .await?;
    Ok((StatusCode::CREATED, Json(AppendLogResponse { id: entry_id })))
}
