//! Request handlers for the ingest API.

use super::types::{ApiError, HealthResponse, IngestParams, IngestResponse};
use crate::config::Config;
use crate::engine::extract_product;
use crate::error::ProdexError;
use crate::tools::fetch::{
    fetch_rendered_html, parse_target_url, RenderBackend, RenderCache, RenderRequest,
};
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<RenderCache>,
    pub backend: Arc<dyn RenderBackend>,
}

pub async fn ingest(
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
) -> Result<Json<IngestResponse>, ApiError> {
    let started = Instant::now();
    let cfg = &state.config;

    let raw_url = params
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ProdexError::InvalidUrl("missing ?url parameter".to_string()))?;
    let url = parse_target_url(raw_url, cfg.ssrf_guard)?;
    let opts = params.to_options(cfg);

    let req = RenderRequest {
        url: url.to_string(),
        selector: opts.selector.clone(),
        wait: opts.wait,
        timeout_ms: opts
            .timeout
            .unwrap_or(cfg.attempt_timeout_ms)
            .min(cfg.max_attempt_timeout_ms),
        mode: opts.mode,
    };

    let outcome = fetch_rendered_html(state.backend.as_ref(), &state.cache, cfg, &req).await?;
    let extraction = extract_product(&outcome.html, &url, &opts)?;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    if elapsed_ms > cfg.wall_clock_budget_ms {
        // The budget is advisory: log it, never cancel the request.
        warn!(url = %url, elapsed_ms, budget_ms = cfg.wall_clock_budget_ms, "wall-clock budget exceeded");
    }
    info!(
        url = %url,
        elapsed_ms,
        attempts = outcome.attempts,
        cached = outcome.from_cache,
        direct = outcome.used_direct_fallback,
        "ingest complete"
    );

    Ok(Json(IngestResponse::from_extraction(extraction, opts.debug)))
}

pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
