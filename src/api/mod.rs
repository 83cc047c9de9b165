//! HTTP surface. Thin handlers translating the JSON contract into service
//! calls; all behavior lives in [`crate::service`].

pub mod logs;
pub mod resources;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::service::ResourceService;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ResourceService>,
}

/// Build the complete router.
pub fn router(service: Arc<ResourceService>) -> Router {
    let state = AppState { service };
    Router::new()
        .route("/health", get(health))
        .merge(resources::routes(state.clone()))
        .merge(logs::routes(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
