//! Environment-configured knobs. The core logic consumes these; it never
//! mutates them after startup.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FETCH_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 600;
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 25_000;
pub const DEFAULT_MAX_ATTEMPT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_MAX_HTML_BYTES: usize = 4 * 1024 * 1024;
pub const DEFAULT_CACHE_TTL_MS: u64 = 10 * 60 * 1000;
pub const DEFAULT_CACHE_MAX_ITEMS: usize = 64;
pub const DEFAULT_MIN_IMAGE_PX: u32 = 200;
pub const DEFAULT_WALL_CLOCK_BUDGET_MS: u64 = 45_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the render dependency (`{render_api_url}/render?...`).
    pub render_api_url: String,
    /// Optional bearer token sent to the render dependency.
    pub render_api_token: Option<String>,
    /// Attempt ceiling for the render dependency.
    pub fetch_attempts: u32,
    /// First backoff interval; grows ×1.8 per attempt with bounded jitter.
    pub backoff_base_ms: u64,
    /// Per-attempt timeout (ms) unless the request overrides it.
    pub attempt_timeout_ms: u64,
    /// Ceiling for request-supplied timeout overrides (ms).
    pub max_attempt_timeout_ms: u64,
    /// Reject HTML bodies larger than this many bytes.
    pub max_html_bytes: usize,
    /// Render-HTML cache entry lifetime.
    pub cache_ttl_ms: u64,
    /// Render-HTML cache capacity (entries).
    pub cache_max_items: usize,
    /// Default minimum inferred pixel dimension for image candidates.
    pub min_image_px: u32,
    /// Drop `.png` image candidates unless the request says otherwise.
    pub exclude_png: bool,
    /// Reject private/loopback hosts before fetching.
    pub ssrf_guard: bool,
    /// Warn (never cancel) when one request exceeds this wall-clock budget.
    pub wall_clock_budget_ms: u64,
    /// HTTP listen address.
    pub listen_addr: String,
    /// Allow cross-origin calls to the HTTP surface.
    pub cors_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render_api_url: "http://127.0.0.1:3000".to_string(),
            render_api_token: None,
            fetch_attempts: DEFAULT_FETCH_ATTEMPTS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            attempt_timeout_ms: DEFAULT_ATTEMPT_TIMEOUT_MS,
            max_attempt_timeout_ms: DEFAULT_MAX_ATTEMPT_TIMEOUT_MS,
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            cache_max_items: DEFAULT_CACHE_MAX_ITEMS,
            min_image_px: DEFAULT_MIN_IMAGE_PX,
            exclude_png: false,
            ssrf_guard: true,
            wall_clock_budget_ms: DEFAULT_WALL_CLOCK_BUDGET_MS,
            listen_addr: "127.0.0.1:8080".to_string(),
            cors_enabled: false,
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut cfg = Config::default();
        if let Ok(v) = std::env::var("RENDER_API_URL") {
            if !v.trim().is_empty() {
                cfg.render_api_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = std::env::var("RENDER_API_TOKEN") {
            if !v.is_empty() {
                cfg.render_api_token = Some(v);
            }
        }
        set_from_env(&mut cfg.fetch_attempts, "FETCH_ATTEMPTS");
        set_from_env(&mut cfg.backoff_base_ms, "BACKOFF_BASE_MS");
        set_from_env(&mut cfg.attempt_timeout_ms, "ATTEMPT_TIMEOUT_MS");
        set_from_env(&mut cfg.max_attempt_timeout_ms, "MAX_ATTEMPT_TIMEOUT_MS");
        set_from_env(&mut cfg.max_html_bytes, "MAX_HTML_BYTES");
        set_from_env(&mut cfg.cache_ttl_ms, "CACHE_TTL_MS");
        set_from_env(&mut cfg.cache_max_items, "CACHE_MAX_ITEMS");
        set_from_env(&mut cfg.min_image_px, "MIN_IMAGE_PX");
        set_from_env(&mut cfg.exclude_png, "EXCLUDE_PNG");
        set_from_env(&mut cfg.ssrf_guard, "SSRF_GUARD");
        set_from_env(&mut cfg.wall_clock_budget_ms, "WALL_CLOCK_BUDGET_MS");
        set_from_env(&mut cfg.cors_enabled, "CORS_ENABLED");
        if let Ok(v) = std::env::var("LISTEN_ADDR") {
            if !v.trim().is_empty() {
                cfg.listen_addr = v;
            }
        }
        cfg
    }
}

fn set_from_env<T: std::str::FromStr>(target: &mut T, key: &str) {
    if let Ok(raw) = std::env::var(key) {
        if let Ok(parsed) = raw.trim().parse::<T>() {
            *target = parsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.fetch_attempts, 3);
        assert_eq!(cfg.backoff_base_ms, 600);
        assert!(cfg.ssrf_guard);
        assert!(cfg.cache_max_items > 0);
    }
}
