//! HTTP request/response types for the ingest API.

use crate::config::Config;
use crate::engine::Extraction;
use crate::error::ProdexError;
use crate::types::{ImageOut, IngestMode, IngestOptions};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query surface of `GET /ingest`. Everything except `url` is optional.
#[derive(Debug, Default, Deserialize)]
pub struct IngestParams {
    pub url: Option<String>,
    pub selector: Option<String>,
    pub wait: Option<u64>,
    pub timeout: Option<u64>,
    pub mode: Option<IngestMode>,
    pub minpx: Option<u32>,
    pub excludepng: Option<bool>,
    pub aggressive: Option<bool>,
    pub harvest: Option<bool>,
    pub sanitize: Option<bool>,
    pub markdown: Option<bool>,
    pub mainonly: Option<bool>,
    pub debug: Option<bool>,
}

impl IngestParams {
    /// Fold the query into extraction options, filling unset knobs from the
    /// server config.
    pub fn to_options(&self, cfg: &Config) -> IngestOptions {
        IngestOptions {
            selector: self.selector.clone(),
            wait: self.wait,
            timeout: self.timeout,
            mode: self.mode.unwrap_or_default(),
            minpx: Some(self.minpx.unwrap_or(cfg.min_image_px)),
            excludepng: Some(self.excludepng.unwrap_or(cfg.exclude_png)),
            aggressive: self.aggressive.unwrap_or(false),
            harvest: self.harvest.unwrap_or(true),
            sanitize: self.sanitize.unwrap_or(true),
            markdown: self.markdown.unwrap_or(false),
            mainonly: self.mainonly.unwrap_or(false),
            debug: self.debug.unwrap_or(false),
        }
    }
}

/// `200` payload of `GET /ingest`.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub source: String,
    pub name_raw: Option<String>,
    pub description_raw: Option<String>,
    pub specs: BTreeMap<String, String>,
    pub features_raw: Vec<String>,
    pub images: Vec<ImageOut>,
    pub manuals: Vec<String>,
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl IngestResponse {
    pub fn from_extraction(extraction: Extraction, debug: bool) -> Self {
        let record = extraction.record;
        Self {
            source: record.source,
            name_raw: record.name,
            description_raw: record.description,
            specs: record.specs,
            features_raw: record.features,
            images: record.images,
            manuals: record.manuals,
            brand: record.brand,
            sku: record.sku,
            price: record.price,
            warnings: if debug { Some(extraction.warnings) } else { None },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// Error body attached to every non-200.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
}

pub struct ApiError(pub ProdexError);

impl From<ProdexError> for ApiError {
    fn from(e: ProdexError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            ProdexError::InvalidUrl(u) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("invalid url: {}", u),
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
            ProdexError::BlockedHost(h) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("blocked host: {}", h),
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
            ProdexError::Insufficient => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "no name and no usable description extracted".to_string(),
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
            ProdexError::Render { status, body } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: "upstream render failed".to_string(),
                    upstream_status: status,
                    upstream_body: Some(body),
                },
            ),
            ProdexError::Timeout(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: format!("upstream timeout: {}", msg),
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
            ProdexError::BodyTooLarge { bytes, limit } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: format!("upstream body too large: {} bytes (limit {})", bytes, limit),
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
            ProdexError::Other(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: msg,
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
