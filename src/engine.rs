//! Per-page extraction engine: parse once, run the structured-data merger
//! and the harvesters over the same immutable document, then canonicalize
//! and merge everything into one normalized record under fixed precedence.

use crate::error::{ProdexError, Result};
use crate::selectors::{LI_SELECTOR, META_SELECTOR, P_SELECTOR, TITLE_SELECTOR};
use crate::tools::clean::{clean, is_mostly_latin};
use crate::tools::context::ContextScorer;
use crate::tools::images::harvest_images;
use crate::tools::manuals::harvest_manuals;
use crate::tools::scriptjson;
use crate::tools::specs::{extract_dom_specs, merge_spec_sources};
use crate::tools::structured::merge_structured_data;
use crate::tools::types::Metadata;
use crate::types::{ImageOut, IngestOptions, ProductRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Bounded output sizes.
pub const MAX_FEATURES: usize = 20;

/// A description shorter than this after cleaning is not usable on its own.
const MIN_DESCRIPTION_CHARS: usize = 30;

const FEATURE_MIN_CHARS: usize = 3;
const FEATURE_MAX_CHARS: usize = 160;

static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("valid h1 selector"));

static KV_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^:]{1,40}:\s").expect("valid regex"));

/// One finished extraction: the record plus any per-source warnings that
/// debug mode surfaces.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: ProductRecord,
    pub warnings: Vec<String>,
}

/// Extract one normalized product record from rendered HTML.
///
/// Per-source failures degrade to "no data from that source"; the only
/// error this returns is [`ProdexError::Insufficient`] when neither a name
/// nor a usable description survived.
pub fn extract_product(html: &str, url: &Url, opts: &IngestOptions) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let mut warnings = Vec::new();

    let facts = merge_structured_data(&doc);
    if facts.is_empty() {
        warnings.push("structured: no product entity in json-ld/microdata/rdfa".to_string());
    }

    let scorer = ContextScorer::new(&doc, opts.mainonly);
    let payloads = if opts.harvest {
        scriptjson::collect_payloads(&doc)
    } else {
        Vec::new()
    };
    let metadata = collect_metadata(&doc);

    let name = resolve_name(&doc, &facts, &metadata, &scorer, opts);
    let description = resolve_description(&doc, &facts, &metadata, &scorer, opts);

    // Specs, in fixed precedence: structured > script-JSON > DOM heuristics.
    let mut spec_sources = vec![facts.specs.clone().into_iter().collect::<Vec<_>>()];
    if opts.harvest {
        spec_sources.push(scriptjson::find_spec_pairs(&payloads));
        let dom = extract_dom_specs(&doc, &scorer, opts.aggressive);
        if dom.is_empty() {
            warnings.push("specs: heuristic harvest found nothing".to_string());
        }
        spec_sources.push(dom);
    }
    let mut specs = merge_spec_sources(spec_sources);

    let brand = facts
        .brand
        .clone()
        .or_else(|| find_metadata_value(&metadata, &["og:brand", "product:brand"]))
        .or_else(|| specs.remove("brand"));
    let sku = facts.sku.clone().or_else(|| specs.remove("sku"));

    let features = resolve_features(&doc, &facts.features, &scorer, opts);

    let images = if opts.harvest {
        harvest_images(
            &doc,
            &facts,
            url,
            name.as_deref(),
            &payloads,
            opts.minpx.unwrap_or(0),
            opts.excludepng.unwrap_or(false),
            &scorer,
        )
    } else {
        structured_only_images(&facts.images, url)
    };
    if images.is_empty() {
        warnings.push("images: no candidate survived ranking".to_string());
    }

    let manuals = if opts.harvest {
        harvest_manuals(&doc, url, name.as_deref(), &payloads, &scorer)
    } else {
        Vec::new()
    };

    if name.is_none() && description.is_none() {
        return Err(ProdexError::Insufficient);
    }

    debug!(
        url = %url,
        specs = specs.len(),
        images = images.len(),
        manuals = manuals.len(),
        "extraction complete"
    );

    Ok(Extraction {
        record: ProductRecord {
            source: url.to_string(),
            name,
            description,
            brand,
            sku,
            price: facts.price,
            specs,
            features,
            images,
            manuals,
            fetched_at: chrono::Utc::now(),
        },
        warnings,
    })
}

/* ---------- metadata ---------- */

/// `<title>` plus every `meta[name|property]` pair, in document order.
fn collect_metadata(doc: &Html) -> Metadata {
    let mut tags = Vec::new();
    if let Some(el) = doc.select(&TITLE_SELECTOR).next() {
        let text = el.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            tags.push(("title".to_string(), text));
        }
    }
    for el in doc.select(&META_SELECTOR) {
        let key = el
            .value()
            .attr("name")
            .or_else(|| el.value().attr("property"))
            .map(|s| s.to_string());
        let value = el.value().attr("content").map(|s| s.to_string());
        if let (Some(k), Some(v)) = (key, value) {
            if !v.trim().is_empty() {
                tags.push((k, v));
            }
        }
    }
    tags
}

/// Find the first non-empty value for any of the given keys.
fn find_metadata_value(pairs: &Metadata, keys: &[&str]) -> Option<String> {
    for key in keys {
        for (k, v) in pairs {
            if k.eq_ignore_ascii_case(key) {
                let cleaned = v.trim().to_string();
                if !cleaned.is_empty() {
                    return Some(cleaned);
                }
            }
        }
    }
    None
}

/* ---------- field resolution chains ---------- */

fn resolve_name(
    doc: &Html,
    facts: &crate::types::StructuredFacts,
    metadata: &Metadata,
    scorer: &ContextScorer,
    opts: &IngestOptions,
) -> Option<String> {
    let raw = facts
        .name
        .clone()
        .or_else(|| find_metadata_value(metadata, &["og:title", "twitter:title"]))
        .or_else(|| main_scope_heading(doc, scorer))
        .or_else(|| {
            find_metadata_value(metadata, &["title"]).map(|t| strip_title_suffix(&t))
        })?;
    let name = if opts.sanitize { clean(&raw) } else { raw };
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn main_scope_heading(doc: &Html, scorer: &ContextScorer) -> Option<String> {
    doc.select(&H1_SELECTOR)
        .filter(|h1| scorer.in_main_scope(h1) && !scorer.is_noise(h1))
        .map(|h1| clean(&h1.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// Drop the `" | Site Name"`-style tail that `<title>` tags carry.
fn strip_title_suffix(title: &str) -> String {
    for sep in [" | ", " – ", " — ", " :: "] {
        if let Some((head, _)) = title.split_once(sep) {
            return head.trim().to_string();
        }
    }
    title.trim().to_string()
}

fn resolve_description(
    doc: &Html,
    facts: &crate::types::StructuredFacts,
    metadata: &Metadata,
    scorer: &ContextScorer,
    opts: &IngestOptions,
) -> Option<String> {
    let candidate = facts
        .description
        .clone()
        .map(|d| if opts.sanitize { clean(&d) } else { d })
        .filter(|d| d.len() >= MIN_DESCRIPTION_CHARS)
        .or_else(|| {
            find_metadata_value(metadata, &["og:description", "description"])
                .map(|d| clean(&d))
                .filter(|d| d.len() >= MIN_DESCRIPTION_CHARS)
        })
        .or_else(|| main_scope_description(doc, scorer, opts.markdown));
    candidate.filter(|d| d.len() >= MIN_DESCRIPTION_CHARS)
}

/// Longest usable paragraph in the main scope. In markdown mode, all
/// usable paragraphs joined by blank lines instead.
fn main_scope_description(doc: &Html, scorer: &ContextScorer, markdown: bool) -> Option<String> {
    let mut paragraphs: Vec<String> = doc
        .select(&P_SELECTOR)
        .filter(|p| scorer.in_main_scope(p) && !scorer.is_noise(p))
        .map(|p| clean(&p.text().collect::<String>()))
        .filter(|t| t.len() >= MIN_DESCRIPTION_CHARS && is_mostly_latin(t))
        .collect();
    if paragraphs.is_empty() {
        return None;
    }
    if markdown {
        paragraphs.truncate(5);
        Some(paragraphs.join("\n\n"))
    } else {
        paragraphs.into_iter().max_by_key(String::len)
    }
}

fn resolve_features(
    doc: &Html,
    structured: &[String],
    scorer: &ContextScorer,
    opts: &IngestOptions,
) -> Vec<String> {
    let mut features = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut push = |raw: String| {
        let text = clean(&raw);
        if text.len() < FEATURE_MIN_CHARS
            || text.len() > FEATURE_MAX_CHARS
            || KV_SHAPE_RE.is_match(&text)
            || !is_mostly_latin(&text)
        {
            return;
        }
        let lowered = text.to_lowercase();
        if !seen.contains(&lowered) {
            seen.push(lowered);
            features.push(text);
        }
    };

    for f in structured {
        push(f.clone());
    }
    if opts.harvest {
        for li in doc.select(&LI_SELECTOR) {
            if !scorer.in_main_scope(&li) || scorer.is_noise(&li) {
                continue;
            }
            push(li.text().collect::<String>());
        }
    }
    features.truncate(MAX_FEATURES);
    features
}

/// Structured-data images only (`harvest=false`), resolved and capped.
fn structured_only_images(raw: &[String], base: &Url) -> Vec<ImageOut> {
    let mut out = Vec::new();
    for candidate in raw {
        let resolved = Url::parse(candidate)
            .ok()
            .or_else(|| base.join(candidate).ok());
        if let Some(u) = resolved {
            if matches!(u.scheme(), "http" | "https") {
                let url = u.to_string();
                if !out.iter().any(|i: &ImageOut| i.url == url) {
                    out.push(ImageOut { url });
                }
            }
        }
    }
    out.truncate(crate::tools::images::MAX_IMAGES);
    out
}
