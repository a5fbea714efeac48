//! Image candidate harvester and ranker.
//!
//! Collects candidate URLs from every place a template might hide the
//! product gallery (structured data, carousel containers, lazy-load
//! attributes, inline background styles, embedded script state), weights
//! each by origin plus contextual and hostname/filename evidence, then
//! ranks, deduplicates by size-stripped basename and caps the list.

mod utils;

#[cfg(test)]
mod tests;

use crate::selectors::{IMG_SELECTOR, STYLED_SELECTOR};
use crate::tools::context::{ContextScorer, HARD_REJECT};
use crate::tools::scriptjson;
use crate::types::{Candidate, ImageOut, StructuredFacts};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use url::Url;
use utils::*;

/// Output ceiling for one page.
pub const MAX_IMAGES: usize = 12;

/* Base weights by candidate origin. */
const W_STRUCTURED: f32 = 10.0;
const W_GALLERY: f32 = 6.0;
const W_LAZY: f32 = 4.0;
const W_SCRIPT: f32 = 4.0;
const W_BACKGROUND: f32 = 3.0;
const W_GENERIC: f32 = 2.0;

/* Evidence bonuses and penalties. */
const BONUS_TRUSTED_HOST: f32 = 2.0;
const BONUS_TOKEN_MATCH: f32 = 3.0;
const BONUS_PRODUCT_PATH: f32 = 2.0;
const PENALTY_THUMBNAIL: f32 = 4.0;

static GALLERY_IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        ".product-gallery img, .gallery img, .carousel img, .product-media img, \
         [class*='slider'] img, [data-gallery] img, .product-images img",
    )
    .expect("valid gallery selector")
});

const LAZY_ATTRS: &[&str] = &[
    "data-src",
    "data-lazy",
    "data-lazy-src",
    "data-original",
    "data-zoom-image",
    "data-large-image",
    "data-srcset",
];

/// Harvest and rank product images. Never more than [`MAX_IMAGES`].
pub fn harvest_images(
    doc: &Html,
    facts: &StructuredFacts,
    base: &Url,
    product_name: Option<&str>,
    payloads: &[Value],
    min_px: u32,
    exclude_png: bool,
    scorer: &ContextScorer,
) -> Vec<ImageOut> {
    let tokens = MatchTokens::build(base, product_name);
    let mut candidates: Vec<Candidate<String>> = Vec::new();

    for raw in &facts.images {
        push_candidate(&mut candidates, base, raw, W_STRUCTURED, 0, "structured", &tokens);
    }

    for img in doc.select(&GALLERY_IMG_SELECTOR) {
        let ctx = scorer.score(&img);
        if ctx == HARD_REJECT {
            continue;
        }
        for raw in element_image_urls(&img) {
            push_candidate(&mut candidates, base, &raw, W_GALLERY, ctx, "gallery", &tokens);
        }
    }

    for img in doc.select(&IMG_SELECTOR) {
        let ctx = scorer.score(&img);
        if ctx == HARD_REJECT {
            continue;
        }
        let lazy: Vec<String> = LAZY_ATTRS
            .iter()
            .filter_map(|a| img.value().attr(a))
            .map(first_srcset_url)
            .collect();
        for raw in lazy {
            push_candidate(&mut candidates, base, &raw, W_LAZY, ctx, "lazy", &tokens);
        }
        if let Some(src) = img.value().attr("src") {
            push_candidate(&mut candidates, base, src, W_GENERIC, ctx, "img", &tokens);
        }
    }

    for el in doc.select(&STYLED_SELECTOR) {
        let ctx = scorer.score(&el);
        if ctx == HARD_REJECT {
            continue;
        }
        if let Some(style) = el.value().attr("style") {
            for raw in background_image_urls(style) {
                push_candidate(&mut candidates, base, &raw, W_BACKGROUND, ctx, "background", &tokens);
            }
        }
    }

    for raw in scriptjson::find_image_urls(payloads) {
        push_candidate(&mut candidates, base, &raw, W_SCRIPT, 0, "script-json", &tokens);
    }

    let mut ranked = rank(candidates, min_px, exclude_png);
    if ranked.is_empty() {
        ranked = fallback_main_scope(doc, base, scorer);
    }
    ranked.truncate(MAX_IMAGES);
    ranked.into_iter().map(|url| ImageOut { url }).collect()
}

fn push_candidate(
    candidates: &mut Vec<Candidate<String>>,
    base: &Url,
    raw: &str,
    weight: f32,
    ctx: i32,
    provenance: &'static str,
    tokens: &MatchTokens,
) {
    let url = match resolve_image_url(base, raw) {
        Some(u) => u,
        None => return,
    };
    let mut score = weight + ctx as f32;
    if is_trusted_host(base, &url) {
        score += BONUS_TRUSTED_HOST;
    }
    if tokens.matches(&url) {
        score += BONUS_TOKEN_MATCH;
    }
    if has_product_path(&url) {
        score += BONUS_PRODUCT_PATH;
    }
    if is_thumbnailish(&url) {
        score -= PENALTY_THUMBNAIL;
    }
    candidates.push(Candidate::new(url, score, provenance));
}

/// Sort by score, drop candidates under the pixel threshold, deduplicate by
/// size-stripped basename so one image's crops collapse to the best crop.
fn rank(candidates: Vec<Candidate<String>>, min_px: u32, exclude_png: bool) -> Vec<String> {
    let mut kept: Vec<Candidate<String>> = candidates
        .into_iter()
        .filter(|c| {
            if exclude_png && has_extension(&c.value, ".png") {
                return false;
            }
            match inferred_dimension(&c.value) {
                Some(px) => px >= min_px,
                None => true,
            }
        })
        .collect();

    // Stable sort keeps document order among equals.
    kept.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let deduped = crate::dedupe!(kept, |c: &Candidate<String>| dedupe_key(&c.value));
    deduped.into_iter().map(|c| c.value).collect()
}

/// Lower-confidence sweep over `img` tags inside the main scope only.
/// Runs when the weighted pass kept nothing; the size and format filters
/// are relaxed so the page yields something rather than nothing.
fn fallback_main_scope(doc: &Html, base: &Url, scorer: &ContextScorer) -> Vec<String> {
    let mut urls = Vec::new();
    for img in doc.select(&IMG_SELECTOR) {
        if !scorer.in_main_scope(&img) || scorer.is_noise(&img) {
            continue;
        }
        if let Some(src) = img.value().attr("src") {
            if let Some(url) = resolve_image_url(base, src) {
                urls.push(url);
            }
        }
    }
    crate::dedupe!(urls, |u: &String| dedupe_key(u))
}

fn element_image_urls(img: &ElementRef) -> Vec<String> {
    let mut urls = Vec::new();
    let v = img.value();
    if let Some(src) = v.attr("src") {
        urls.push(src.to_string());
    }
    for attr in LAZY_ATTRS {
        if let Some(raw) = v.attr(attr) {
            urls.push(first_srcset_url(raw));
        }
    }
    if let Some(srcset) = v.attr("srcset") {
        urls.push(first_srcset_url(srcset));
    }
    urls
}
