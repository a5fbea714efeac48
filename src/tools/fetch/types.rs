use crate::types::IngestMode;
use serde::{Deserialize, Serialize};
use url::Url;

/// One fully-qualified request to the render dependency. The rendered URL
/// string doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub url: String,
    pub selector: Option<String>,
    pub wait: Option<u64>,
    pub timeout_ms: u64,
    pub mode: IngestMode,
}

impl RenderRequest {
    /// The render dependency call for this request:
    /// `{api_base}/render?url=...&selector=...&wait=...&timeout=...&mode=...`
    pub fn render_url(&self, api_base: &str) -> String {
        let mut params: Vec<(&str, String)> = vec![("url", self.url.clone())];
        if let Some(selector) = &self.selector {
            params.push(("selector", selector.clone()));
        }
        if let Some(wait) = self.wait {
            params.push(("wait", wait.to_string()));
        }
        params.push(("timeout", self.timeout_ms.to_string()));
        params.push(("mode", self.mode.as_str().to_string()));

        let endpoint = format!("{}/render", api_base.trim_end_matches('/'));
        match Url::parse_with_params(&endpoint, &params) {
            Ok(u) => u.to_string(),
            Err(_) => endpoint,
        }
    }
}

/// Raw response from the render dependency or the direct-fetch fallback.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Gateway statuses that mean the renderer is struggling while the
    /// origin may not be; they trigger the one direct-fetch fallback.
    pub fn is_gateway_error(&self) -> bool {
        matches!(self.status, 502 | 503 | 504)
    }
}

/// Result of one resolved fetch, with telemetry metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    /// The rendered (or directly fetched) HTML.
    pub html: String,
    /// Attempts made against the render dependency.
    pub attempts: u32,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Served from the TTL+LRU cache.
    pub from_cache: bool,
    /// Satisfied by the direct-fetch fallback instead of the renderer.
    pub used_direct_fallback: bool,
}
