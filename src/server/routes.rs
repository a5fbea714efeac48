//! Route table for the ingest API.

use super::handlers::{healthz, ingest, AppState};
use axum::routing::get;
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ingest", get(ingest))
        .route("/healthz", get(healthz))
        .with_state(state)
}
