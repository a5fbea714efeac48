use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One harvested image URL, already resolved against the page base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOut {
    pub url: String,
}

/// The normalized record emitted for one product page.
///
/// Invariants: `images.len() <= 12`, `features.len() <= 20`, `manuals`
/// deduplicated by path ignoring query/fragment, `specs` keys canonical
/// (lowercase, underscore-separated, synonym-resolved).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub source: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub specs: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub images: Vec<ImageOut>,
    pub manuals: Vec<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Partial facts parsed from one page's embedded semantic metadata
/// (JSON-LD, microdata, RDFa), already merged by encoding precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredFacts {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub specs: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
}

impl StructuredFacts {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.brand.is_none()
            && self.sku.is_none()
            && self.price.is_none()
            && self.specs.is_empty()
            && self.features.is_empty()
            && self.images.is_empty()
    }
}

/// A scored, provenance-tagged piece of evidence competing to populate one
/// output field. Ephemeral: consumed by the ranking/merge step.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub value: T,
    pub score: f32,
    pub provenance: &'static str,
}

impl<T> Candidate<T> {
    pub fn new(value: T, score: f32, provenance: &'static str) -> Self {
        Self {
            value,
            score,
            provenance,
        }
    }
}

/// Render mode forwarded to the render dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    Fast,
    #[default]
    Full,
}

impl IngestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestMode::Fast => "fast",
            IngestMode::Full => "full",
        }
    }
}

/// Per-request extraction knobs. Mirrors the `/ingest` query surface; every
/// field has a serde default so callers only say what they mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOptions {
    /// CSS selector the render dependency should wait for.
    #[serde(default)]
    pub selector: Option<String>,
    /// Extra settle time (ms) after render, forwarded upstream.
    #[serde(default)]
    pub wait: Option<u64>,
    /// Per-attempt render timeout override (ms).
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub mode: IngestMode,
    /// Minimum inferred pixel dimension for image candidates.
    #[serde(default)]
    pub minpx: Option<u32>,
    /// Drop `.png` image candidates.
    #[serde(default)]
    pub excludepng: Option<bool>,
    /// Enable the paragraph/list `key: value` fallback sweeps.
    #[serde(default)]
    pub aggressive: bool,
    /// Run the DOM harvesters (false = structured data only).
    #[serde(default = "default_true")]
    pub harvest: bool,
    /// Run the clean pipeline over name/description.
    #[serde(default = "default_true")]
    pub sanitize: bool,
    /// Join description paragraphs with blank lines instead of one space.
    #[serde(default)]
    pub markdown: bool,
    /// Treat everything outside the main product scope as a hard reject.
    #[serde(default)]
    pub mainonly: bool,
    /// Attach per-source warnings to the response.
    #[serde(default)]
    pub debug: bool,
}

fn default_true() -> bool {
    true
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            selector: None,
            wait: None,
            timeout: None,
            mode: IngestMode::default(),
            minpx: None,
            excludepng: None,
            aggressive: false,
            harvest: true,
            sanitize: true,
            markdown: false,
            mainonly: false,
            debug: false,
        }
    }
}
