//! Structured-data merger.
//!
//! Parses the three independent product-metadata encodings embedded in one
//! document (JSON-LD blocks, microdata attributes, RDFa attributes) and
//! merges the partial results by fixed precedence. Malformed input in any
//! one block or encoding degrades to "no data from that source".

mod jsonld;
mod microdata;
mod rdfa;


use crate::types::StructuredFacts;
use scraper::Html;

/// Parse and merge all three encodings.
///
/// Scalars (name, description, brand, sku, price) take the first non-empty
/// value across JSON-LD → microdata → RDFa. Images are unioned across all
/// three, deduplicated by URL. Specs are unioned with JSON-LD winning on
/// key collision. Features are unioned with case-insensitive dedup.
pub fn merge_structured_data(doc: &Html) -> StructuredFacts {
    let sources = [
        jsonld::extract(doc),
        microdata::extract(doc),
        rdfa::extract(doc),
    ];

    let mut merged = StructuredFacts::default();
    let mut seen_features: Vec<String> = Vec::new();

    for facts in sources.into_iter().flatten() {
        merge_scalar(&mut merged.name, facts.name);
        merge_scalar(&mut merged.description, facts.description);
        merge_scalar(&mut merged.brand, facts.brand);
        merge_scalar(&mut merged.sku, facts.sku);
        if merged.price.is_none() {
            merged.price = facts.price;
        }
        for url in facts.images {
            if !url.trim().is_empty() && !merged.images.contains(&url) {
                merged.images.push(url);
            }
        }
        for (k, v) in facts.specs {
            // Earlier sources win on collision; JSON-LD runs first.
            merged.specs.entry(k).or_insert(v);
        }
        for feature in facts.features {
            let lowered = feature.to_lowercase();
            if !feature.trim().is_empty() && !seen_features.contains(&lowered) {
                seen_features.push(lowered);
                merged.features.push(feature);
            }
        }
    }

    merged
}

fn merge_scalar(target: &mut Option<String>, incoming: Option<String>) {
    if target.as_deref().map_or(true, |s| s.trim().is_empty()) {
        if let Some(v) = incoming {
            if !v.trim().is_empty() {
                *target = Some(v);
            }
        }
    }
}

/// True when a declared type names a Product (string or array form,
/// case-insensitive, tolerating full schema.org URLs).
pub(super) fn type_is_product(declared: &str) -> bool {
    declared
        .rsplit('/')
        .next()
        .unwrap_or(declared)
        .to_ascii_lowercase()
        .contains("product")
}

pub(super) fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok().filter(|p| *p >= 0.0)
}
