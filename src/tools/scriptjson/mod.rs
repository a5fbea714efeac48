//! Bounded walk over script-embedded JSON state.
//!
//! Product pages routinely ship their application state as JSON inside
//! `<script>` tags (`window.__STATE__ = {...}`, `__NEXT_DATA__`, inline
//! config blobs). This module parses those payloads tolerantly and walks the
//! resulting `serde_json::Value` trees with a hard depth bound, picking out
//! image URLs, `{name, value}`-shaped spec pairs and document links with
//! pure predicates. One malformed payload never affects the others.


use crate::selectors::SCRIPT_SELECTOR;
use crate::tools::context::is_recommendation_path;
use scraper::Html;
use serde_json::Value;

/// Recursion ceiling for the value walk. Deeply nested state beyond this is
/// pathological and gets ignored rather than risking a stack overflow.
const MAX_WALK_DEPTH: usize = 32;

/// Skip script bodies larger than this; real state blobs are smaller and
/// giant ones are usually bundled application code.
const MAX_SCRIPT_BYTES: usize = 1_500_000;

const IMAGE_KEY_HINTS: &[&str] = &[
    "image", "images", "img", "src", "srcset", "url", "thumbnail", "thumb", "zoom", "large",
    "original", "media", "picture", "gallery",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif", ".avif"];

const SPEC_NAME_KEYS: &[&str] = &["name", "label", "key", "title"];
const SPEC_VALUE_KEYS: &[&str] = &["value", "val", "text"];

/// Parse every non-JSON-LD script body on the page that yields JSON, either
/// directly or after trimming an assignment to its outermost brace pair.
pub fn collect_payloads(doc: &Html) -> Vec<Value> {
    let mut payloads = Vec::new();
    for script in doc.select(&SCRIPT_SELECTOR) {
        let ty = script.value().attr("type").unwrap_or("");
        if ty.eq_ignore_ascii_case("application/ld+json") {
            continue;
        }
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > MAX_SCRIPT_BYTES {
            continue;
        }
        if let Some(value) = parse_payload(raw) {
            payloads.push(value);
        }
    }
    payloads
}

/// Tolerant payload parse: whole-body JSON first, then the outermost
/// `{...}` span of an assignment-style body.
fn parse_payload(raw: &str) -> Option<Value> {
    if raw.starts_with('{') || raw.starts_with('[') {
        if let Ok(v) = serde_json::from_str::<Value>(raw) {
            return filter_trivial(v);
        }
    }
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&raw[start..=end])
        .ok()
        .and_then(filter_trivial)
}

fn filter_trivial(v: Value) -> Option<Value> {
    let keep = match &v {
        Value::Object(m) => !m.is_empty(),
        Value::Array(a) => !a.is_empty(),
        _ => false,
    };
    keep.then_some(v)
}

/// Depth-first visitor over one payload. The visitor sees every value with
/// its key path (array indices excluded from the path).
fn walk<'a>(value: &'a Value, path: &mut Vec<&'a str>, depth: usize, visit: &mut dyn FnMut(&[&str], &'a Value)) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    visit(path, value);
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                path.push(k.as_str());
                walk(v, path, depth + 1, visit);
                path.pop();
            }
        }
        Value::Array(items) => {
            for v in items {
                walk(v, path, depth + 1, visit);
            }
        }
        _ => {}
    }
}

fn is_url_shaped(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//") || s.starts_with('/')
}

fn has_image_extension(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let path_end = lower.find(['?', '#']).unwrap_or(lower.len());
    IMAGE_EXTENSIONS.iter().any(|ext| lower[..path_end].ends_with(ext))
}

fn key_hints_image(path: &[&str]) -> bool {
    path.iter().rev().take(3).any(|seg| {
        let seg = seg.to_ascii_lowercase();
        IMAGE_KEY_HINTS.iter().any(|h| seg.contains(h))
    })
}

/// Image URLs found under common key names and containers.
pub fn find_image_urls(payloads: &[Value]) -> Vec<String> {
    let mut urls = Vec::new();
    for payload in payloads {
        let mut path = Vec::new();
        walk(payload, &mut path, 0, &mut |path, value| {
            if let Value::String(s) = value {
                if is_url_shaped(s) && has_image_extension(s) && key_hints_image(path) {
                    urls.push(s.clone());
                }
            }
        });
    }
    crate::dedupe!(urls)
}

/// `{name|label, value}`-shaped spec pairs, skipping any whose JSON path
/// looks like a recommendation block.
pub fn find_spec_pairs(payloads: &[Value]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for payload in payloads {
        let mut path = Vec::new();
        walk(payload, &mut path, 0, &mut |path, value| {
            let obj = match value {
                Value::Object(m) => m,
                _ => return,
            };
            if is_recommendation_path(&path.join(".")) {
                return;
            }
            let name = SPEC_NAME_KEYS
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str));
            let name = match name {
                Some(n) if !n.trim().is_empty() && n.len() <= 60 => n.trim(),
                _ => return,
            };
            let val = SPEC_VALUE_KEYS.iter().find_map(|k| match obj.get(*k) {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                _ => None,
            });
            if let Some(val) = val {
                pairs.push((name.to_string(), val));
            }
        });
    }
    pairs
}

/// Document-like URLs (PDF paths) anywhere in the payloads. The manual
/// harvester applies its own allow/deny keyword filter on top.
pub fn find_document_urls(payloads: &[Value]) -> Vec<String> {
    let mut urls = Vec::new();
    for payload in payloads {
        let mut path = Vec::new();
        walk(payload, &mut path, 0, &mut |_path, value| {
            if let Value::String(s) = value {
                let lower = s.to_ascii_lowercase();
                if is_url_shaped(s) && (lower.contains(".pdf") || lower.contains("/manual")) {
                    urls.push(s.clone());
                }
            }
        });
    }
    crate::dedupe!(urls)
}
