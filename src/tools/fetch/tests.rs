use super::*;
use crate::config::Config;
use crate::error::ProdexError;
use crate::types::IngestMode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

enum StubReply {
    Respond(u16, &'static str),
    Fail(&'static str),
}

struct StubBackend {
    render_replies: Mutex<VecDeque<StubReply>>,
    direct_reply: Mutex<Option<StubReply>>,
    render_calls: AtomicU32,
    direct_calls: AtomicU32,
}

impl StubBackend {
    fn new(render: Vec<StubReply>, direct: Option<StubReply>) -> Self {
        Self {
            render_replies: Mutex::new(render.into()),
            direct_reply: Mutex::new(direct),
            render_calls: AtomicU32::new(0),
            direct_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait::async_trait]
impl RenderBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn render(&self, _req: &RenderRequest) -> crate::error::Result<BackendResponse> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .render_replies
            .lock()
            .expect("stub mutex")
            .pop_front()
            .unwrap_or(StubReply::Fail("stub exhausted"));
        match reply {
            StubReply::Respond(status, body) => Ok(BackendResponse {
                status,
                body: body.to_string(),
            }),
            StubReply::Fail(msg) => Err(ProdexError::Other(msg.to_string())),
        }
    }

    async fn fetch_direct(&self, _url: &str) -> crate::error::Result<BackendResponse> {
        self.direct_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .direct_reply
            .lock()
            .expect("stub mutex")
            .take()
            .unwrap_or(StubReply::Fail("no direct reply"));
        match reply {
            StubReply::Respond(status, body) => Ok(BackendResponse {
                status,
                body: body.to_string(),
            }),
            StubReply::Fail(msg) => Err(ProdexError::Other(msg.to_string())),
        }
    }
}

fn test_config() -> Config {
    Config {
        backoff_base_ms: 1,
        ..Config::default()
    }
}

fn request() -> RenderRequest {
    RenderRequest {
        url: "https://shop.example.com/p/1".to_string(),
        selector: None,
        wait: None,
        timeout_ms: 5_000,
        mode: IngestMode::Full,
    }
}

#[tokio::test]
async fn success_is_cached_for_the_next_call() {
    let backend = StubBackend::new(vec![StubReply::Respond(200, "<html>ok</html>")], None);
    let cache = RenderCache::new(60_000, 8);
    let cfg = test_config();

    let first = fetch_rendered_html(&backend, &cache, &cfg, &request())
        .await
        .expect("first fetch");
    assert!(!first.from_cache);
    assert_eq!(first.attempts, 1);

    let second = fetch_rendered_html(&backend, &cache, &cfg, &request())
        .await
        .expect("second fetch");
    assert!(second.from_cache);
    assert_eq!(second.html, "<html>ok</html>");
    assert_eq!(backend.render_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let backend = StubBackend::new(
        vec![
            StubReply::Respond(500, "boom"),
            StubReply::Fail("connection reset"),
            StubReply::Respond(200, "<html>late</html>"),
        ],
        None,
    );
    let cache = RenderCache::new(60_000, 8);
    let outcome = fetch_rendered_html(&backend, &cache, &test_config(), &request())
        .await
        .expect("eventual success");
    assert_eq!(outcome.attempts, 3);
    assert_eq!(backend.render_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gateway_error_falls_back_to_direct_fetch_without_more_render_retries() {
    let backend = StubBackend::new(
        vec![StubReply::Respond(503, "render overloaded")],
        Some(StubReply::Respond(200, "<html>origin fine</html>")),
    );
    let cache = RenderCache::new(60_000, 8);
    let outcome = fetch_rendered_html(&backend, &cache, &test_config(), &request())
        .await
        .expect("direct fallback");
    assert!(outcome.used_direct_fallback);
    assert_eq!(outcome.html, "<html>origin fine</html>");
    assert_eq!(backend.render_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.direct_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_direct_fallback_surfaces_the_render_status() {
    let backend = StubBackend::new(
        vec![StubReply::Respond(502, "bad gateway body")],
        Some(StubReply::Respond(500, "origin down")),
    );
    let cache = RenderCache::new(60_000, 8);
    let err = fetch_rendered_html(&backend, &cache, &test_config(), &request())
        .await
        .expect_err("must fail");
    match err {
        ProdexError::Render { status, body } => {
            assert_eq!(status, Some(502));
            assert!(body.contains("bad gateway"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // No second render attempt after a gateway error.
    assert_eq!(backend.render_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversized_bodies_are_retried_then_rejected() {
    let body = "<html>this body is way too large</html>";
    let backend = StubBackend::new(
        vec![
            StubReply::Respond(200, body),
            StubReply::Respond(200, body),
            StubReply::Respond(200, body),
        ],
        None,
    );
    let cache = RenderCache::new(60_000, 8);
    let cfg = Config {
        max_html_bytes: 10,
        ..test_config()
    };
    let err = fetch_rendered_html(&backend, &cache, &cfg, &request())
        .await
        .expect_err("must reject");
    assert!(matches!(err, ProdexError::BodyTooLarge { .. }));
    assert_eq!(backend.render_calls.load(Ordering::SeqCst), 3);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn exhausted_attempts_surface_the_last_error() {
    let backend = StubBackend::new(
        vec![
            StubReply::Respond(500, "one"),
            StubReply::Respond(500, "two"),
            StubReply::Respond(429, "three"),
        ],
        None,
    );
    let cache = RenderCache::new(60_000, 8);
    let err = fetch_rendered_html(&backend, &cache, &test_config(), &request())
        .await
        .expect_err("must fail");
    match err {
        ProdexError::Render { status, body } => {
            assert_eq!(status, Some(429));
            assert_eq!(body, "three");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.render_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn render_url_carries_the_full_query_surface() {
    let req = RenderRequest {
        url: "https://shop.example.com/p/1?a=b".to_string(),
        selector: Some(".product".to_string()),
        wait: Some(500),
        timeout_ms: 8_000,
        mode: IngestMode::Fast,
    };
    let rendered = req.render_url("http://render.internal:3000");
    assert!(rendered.starts_with("http://render.internal:3000/render?"));
    assert!(rendered.contains("url=https%3A%2F%2Fshop.example.com"));
    assert!(rendered.contains("selector=.product"));
    assert!(rendered.contains("wait=500"));
    assert!(rendered.contains("timeout=8000"));
    assert!(rendered.contains("mode=fast"));
}
