//! Manual/document harvester.
//!
//! Scans anchors, embedded document viewers, onclick handlers and script
//! JSON for user-facing documents (manuals, IFUs, datasheets, guides),
//! denying the regulatory paperwork that shares their hosting directories.

#[cfg(test)]
mod tests;

use crate::selectors::{LINK_SELECTOR, ONCLICK_SELECTOR, VIEWER_SELECTOR};
use crate::tools::context::{ContextScorer, HARD_REJECT};
use crate::types::Candidate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use url::Url;

static DOC_ALLOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)manual|\bifu\b|instructions?|datasheet|data-sheet|spec-sheet|user-guide|\bguide\b|brochure|quick-?start|assembly",
    )
    .expect("valid regex")
});

static DOC_DENY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)certificat|\biso\b|mdsap|audit|regulatory|warranty|declaration|conformity|\bce[-_]?mark|privacy|terms",
    )
    .expect("valid regex")
});

static ONCLICK_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"]([^'"]+\.pdf[^'"]*)['"]"#).expect("valid regex")
});

const W_ANCHOR: f32 = 4.0;
const W_VIEWER: f32 = 4.0;
const W_ONCLICK: f32 = 3.0;
const W_SCRIPT: f32 = 3.0;
const BONUS_TOKEN: f32 = 3.0;

/// Harvest user-facing document URLs, ranked and deduplicated by path
/// (query/fragment ignored).
pub fn harvest_manuals(
    doc: &Html,
    base: &Url,
    product_name: Option<&str>,
    payloads: &[Value],
    scorer: &ContextScorer,
) -> Vec<String> {
    let tokens = name_tokens(base, product_name);
    let mut candidates: Vec<Candidate<String>> = Vec::new();

    for link in doc.select(&LINK_SELECTOR) {
        let ctx = scorer.score(&link);
        if ctx == HARD_REJECT {
            continue;
        }
        let href = link.value().attr("href").unwrap_or("");
        let label = link.text().collect::<String>();
        if looks_like_document(href, Some(&label)) {
            push_candidate(&mut candidates, base, href, W_ANCHOR + ctx as f32, "anchor", &tokens);
        }
    }

    for viewer in doc.select(&VIEWER_SELECTOR) {
        let ctx = scorer.score(&viewer);
        if ctx == HARD_REJECT {
            continue;
        }
        let src = viewer
            .value()
            .attr("data")
            .or_else(|| viewer.value().attr("src"))
            .unwrap_or("");
        if looks_like_document(src, None) {
            push_candidate(&mut candidates, base, src, W_VIEWER + ctx as f32, "viewer", &tokens);
        }
    }

    for el in doc.select(&ONCLICK_SELECTOR) {
        let ctx = scorer.score(&el);
        if ctx == HARD_REJECT {
            continue;
        }
        if let Some(onclick) = el.value().attr("onclick") {
            for caps in ONCLICK_URL_RE.captures_iter(onclick) {
                let raw = &caps[1];
                if looks_like_document(raw, None) {
                    push_candidate(&mut candidates, base, raw, W_ONCLICK + ctx as f32, "onclick", &tokens);
                }
            }
        }
    }

    for raw in crate::tools::scriptjson::find_document_urls(payloads) {
        if looks_like_document(&raw, None) {
            push_candidate(&mut candidates, base, &raw, W_SCRIPT, "script-json", &tokens);
        }
    }

    let ranked = rank_and_dedupe(candidates);
    if !ranked.is_empty() {
        return ranked;
    }

    // Scoped harvest found nothing: sweep the whole page, same hostname only.
    let mut swept: Vec<Candidate<String>> = Vec::new();
    for link in doc.select(&LINK_SELECTOR) {
        let href = link.value().attr("href").unwrap_or("");
        if !looks_like_document(href, None) {
            continue;
        }
        if let Some(url) = resolve_document_url(base, href) {
            let host = Url::parse(&url).ok().and_then(|u| u.host_str().map(str::to_string));
            if host.as_deref() == base.host_str() {
                swept.push(Candidate::new(url, 1.0, "fallback"));
            }
        }
    }
    rank_and_dedupe(swept)
}

/// PDF extension, or an allow-listed document keyword in the URL or link
/// label, unless a deny keyword marks it as regulatory paperwork.
fn looks_like_document(raw_url: &str, label: Option<&str>) -> bool {
    if raw_url.trim().is_empty() {
        return false;
    }
    let lower = raw_url.to_ascii_lowercase();
    if DOC_DENY_RE.is_match(&lower) || label.map(|l| DOC_DENY_RE.is_match(l)).unwrap_or(false) {
        return false;
    }
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    if path.ends_with(".pdf") {
        return true;
    }
    DOC_ALLOW_RE.is_match(&lower) || label.map(|l| DOC_ALLOW_RE.is_match(l)).unwrap_or(false)
}

fn push_candidate(
    candidates: &mut Vec<Candidate<String>>,
    base: &Url,
    raw: &str,
    score: f32,
    provenance: &'static str,
    tokens: &[String],
) {
    let url = match resolve_document_url(base, raw) {
        Some(u) => u,
        None => return,
    };
    let lower = url.to_ascii_lowercase();
    let mut score = score;
    if tokens.iter().any(|t| lower.contains(t)) {
        score += BONUS_TOKEN;
    }
    candidates.push(Candidate::new(url, score, provenance));
}

fn resolve_document_url(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("javascript:") || raw.starts_with("data:") {
        return None;
    }
    let url = if let Some(rest) = raw.strip_prefix("//") {
        Url::parse(&format!("{}://{}", base.scheme(), rest)).ok()?
    } else {
        Url::parse(raw).ok().or_else(|| base.join(raw).ok())?
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    Some(url.to_string())
}

/// Highest score first; duplicates collapse on path ignoring query/fragment.
fn rank_and_dedupe(mut candidates: Vec<Candidate<String>>) -> Vec<String> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    let deduped = crate::dedupe!(candidates, |c: &Candidate<String>| path_key(&c.value));
    deduped.into_iter().map(|c| c.value).collect()
}

/// Scheme+host+path, lowercased: the identity used for dedup.
fn path_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(u) => format!(
            "{}://{}{}",
            u.scheme(),
            u.host_str().unwrap_or(""),
            u.path()
        )
        .to_ascii_lowercase(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase(),
    }
}

fn name_tokens(base: &Url, product_name: Option<&str>) -> Vec<String> {
    let mut tokens = Vec::new();
    if let Some(segments) = base.path_segments() {
        for segment in segments {
            for token in segment.split(|c: char| !c.is_ascii_alphanumeric()) {
                if token.len() >= 4 && token.chars().any(|c| c.is_ascii_digit()) {
                    tokens.push(token.to_ascii_lowercase());
                }
            }
        }
    }
    if let Some(name) = product_name {
        tokens.extend(
            name.split(|c: char| !c.is_ascii_alphanumeric())
                .filter(|t| t.len() >= 4)
                .take(5)
                .map(|t| t.to_ascii_lowercase()),
        );
    }
    tokens
}
