//! HTTP implementation of the render backend.

use super::types::{BackendResponse, RenderRequest};
use super::RenderBackend;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::{header, redirect, Client};
use std::time::Duration;

const REDIRECT_LIMIT: usize = 10;
const POOL_IDLE_TIMEOUT_SEC: u64 = 90;
const DIRECT_FETCH_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0";

pub struct HttpRenderClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl HttpRenderClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SEC))
            // Per-attempt deadlines come from tokio timeouts; this is the
            // absolute ceiling for a single hung connection.
            .timeout(Duration::from_millis(cfg.attempt_timeout_ms.max(1_000) * 2))
            .build()?;
        Ok(Self {
            client,
            api_base: cfg.render_api_url.clone(),
            token: cfg.render_api_token.clone(),
        })
    }
}

#[async_trait]
impl RenderBackend for HttpRenderClient {
    fn name(&self) -> &'static str {
        "http-render-client"
    }

    async fn render(&self, req: &RenderRequest) -> Result<BackendResponse> {
        let mut builder = self.client.get(req.render_url(&self.api_base));
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(BackendResponse { status, body })
    }

    async fn fetch_direct(&self, url: &str) -> Result<BackendResponse> {
        let resp = self
            .client
            .get(url)
            .header(header::USER_AGENT, DIRECT_FETCH_UA)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(BackendResponse { status, body })
    }
}
