//! Render fetch & cache layer.
//!
//! `fetch_rendered_html` resolves one page: TTL+LRU cache first, then the
//! render dependency with bounded, jitter-backed sequential retries, with a
//! single direct-fetch fallback when the renderer itself is the thing
//! failing (502/503/504). Oversized bodies are rejected before they reach
//! the parser. Successful HTML is cached before being returned.

mod cache;
mod client;
mod guard;
mod retry;

pub mod types;

#[cfg(test)]
mod tests;

pub use cache::RenderCache;
pub use client::HttpRenderClient;
pub use guard::{is_likely_dangerous_host, parse_target_url};
pub use types::*;

use crate::config::Config;
use crate::error::{ProdexError, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The render dependency seam. Tests substitute stub backends; production
/// uses [`HttpRenderClient`].
#[async_trait]
pub trait RenderBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// One call to the render dependency.
    async fn render(&self, req: &RenderRequest) -> Result<BackendResponse>;

    /// One raw fetch of the page itself, bypassing rendering.
    async fn fetch_direct(&self, url: &str) -> Result<BackendResponse>;
}

/// Fetch rendered HTML for one request, through the cache.
pub async fn fetch_rendered_html(
    backend: &dyn RenderBackend,
    cache: &RenderCache,
    cfg: &Config,
    req: &RenderRequest,
) -> Result<FetchOutcome> {
    let started = Instant::now();
    let key = req.render_url(&cfg.render_api_url);

    if let Some(html) = cache.get(&key) {
        debug!(url = %req.url, "render cache hit");
        return Ok(FetchOutcome {
            html,
            attempts: 0,
            duration_ms: started.elapsed().as_millis() as u64,
            from_cache: true,
            used_direct_fallback: false,
        });
    }

    let attempt_timeout = Duration::from_millis(req.timeout_ms.max(1));
    let mut last_error = ProdexError::render_error(None, "no attempts made");

    for attempt in 1..=cfg.fetch_attempts.max(1) {
        let outcome = tokio::time::timeout(attempt_timeout, backend.render(req)).await;
        match outcome {
            Ok(Ok(resp)) if resp.is_success() => {
                match check_body_size(resp.body, cfg.max_html_bytes) {
                    Ok(html) => {
                        cache.insert(&key, html.clone());
                        return Ok(FetchOutcome {
                            html,
                            attempts: attempt,
                            duration_ms: started.elapsed().as_millis() as u64,
                            from_cache: false,
                            used_direct_fallback: false,
                        });
                    }
                    Err(e) => {
                        last_error = e;
                    }
                }
            }
            Ok(Ok(resp)) if resp.is_gateway_error() => {
                // The renderer is struggling; the origin may not be. One
                // direct fetch, and no further render retries either way.
                warn!(url = %req.url, status = resp.status, "render gateway error, trying direct fetch");
                let render_failure = ProdexError::render_error(Some(resp.status), &resp.body);
                match tokio::time::timeout(attempt_timeout, backend.fetch_direct(&req.url)).await {
                    Ok(Ok(direct)) if direct.is_success() => {
                        let html = check_body_size(direct.body, cfg.max_html_bytes)?;
                        cache.insert(&key, html.clone());
                        return Ok(FetchOutcome {
                            html,
                            attempts: attempt,
                            duration_ms: started.elapsed().as_millis() as u64,
                            from_cache: false,
                            used_direct_fallback: true,
                        });
                    }
                    _ => return Err(render_failure),
                }
            }
            Ok(Ok(resp)) => {
                last_error = ProdexError::render_error(Some(resp.status), &resp.body);
            }
            Ok(Err(e)) => {
                last_error = e;
            }
            Err(_) => {
                last_error = ProdexError::Timeout(format!(
                    "attempt {} exceeded {}ms",
                    attempt,
                    attempt_timeout.as_millis()
                ));
            }
        }

        if attempt < cfg.fetch_attempts {
            let wait = retry::backoff_ms(cfg.backoff_base_ms, attempt);
            debug!(url = %req.url, attempt, wait_ms = wait, "render attempt failed, backing off");
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
    }

    Err(last_error)
}

fn check_body_size(body: String, limit: usize) -> Result<String> {
    if body.len() > limit {
        return Err(ProdexError::BodyTooLarge {
            bytes: body.len(),
            limit,
        });
    }
    Ok(body)
}
