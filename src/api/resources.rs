use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;

use crate::error::ServiceError;
use crate::store::models::{NewResource, Resource, ResourcePatch};

use super::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/resources", get(list).post(create))
        .route("/api/resources/{id}", put(update).delete(delete))
        .with_state(state)
}

/// Row-count response for update and delete, mirroring what the dashboard
/// client expects.
#[derive(Serialize)]
struct ChangesResponse {
    message: &'static str,
    changes: usize,
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, ServiceError> {
    Ok(Json(state.service.list_resources().await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewResource>,
) -> Result<(StatusCode, Json<Resource>), ServiceError> {
    let resource = state.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ResourcePatch>,
) -> Result<Json<ChangesResponse>, ServiceError> {
    let (_, changes) = state.service.update(id, patch).await?;
    Ok(Json(ChangesResponse {
        message: "Resource updated",
        changes,
    }))
}

async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ChangesResponse>, ServiceError> {
    let changes = state.service.delete(id).await?;
    Ok(Json(ChangesResponse {
        message: "Resource deleted",
        changes,
    }))
}
