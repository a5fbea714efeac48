//! Specification extractor.
//!
//! Four DOM strategies run in order of trust (a labeled specification
//! pane, the densest panel, a global table/definition-list sweep, a
//! paragraph/list `key: value` fallback), stopping at the first with
//! non-trivial output, else unioning all. Script-JSON pairs are extracted
//! separately (`scriptjson::find_spec_pairs`) and merged by the engine with
//! fixed precedence. Everything funnels through the canonicalizer.

mod canon;


pub use canon::{canonicalize_spec_key, decompose_dimensions, is_parts_key, normalize_units};

use crate::selectors::{CELL_SELECTOR, DL_SELECTOR, LI_SELECTOR, P_SELECTOR, TABLE_SELECTOR, TR_SELECTOR};
use crate::tools::clean::clean;
use crate::tools::context::ContextScorer;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Fewer canonical entries than this is as likely a stray `key: value`
/// paragraph as a real spec block.
const NON_TRIVIAL_ENTRIES: usize = 2;

const MAX_KEY_CHARS: usize = 60;
const MAX_VALUE_CHARS: usize = 300;

static SPEC_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bspec(ification)?s?\b|technical\s+(details|data|specifications)|tech\s+specs")
        .expect("valid regex")
});

static KV_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][^:]{1,59}):\s+(.{1,300})$").expect("valid regex"));

static PARTS_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bqty\b|\bquantity\b|part\s*(no|number|#)|\border\b|item\s*#|\beach\b")
        .expect("valid regex")
});

static PANE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "[role='tabpanel'], .tab-pane, .tab-content, .accordion-item, .accordion-content, \
         .panel, section, [class*='spec'], [id*='spec']",
    )
    .expect("valid pane selector")
});

static TAB_LABEL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href^='#'], [role='tab'][aria-controls], button[aria-controls]")
        .expect("valid tab label selector")
});

/// Raw key/value pairs from the DOM, in the cascade's resolution order.
/// Keys and values are cleaned but not yet canonical.
pub fn extract_dom_specs(doc: &Html, scorer: &ContextScorer, aggressive: bool) -> Vec<(String, String)> {
    let labeled = labeled_pane_pairs(doc, scorer);
    if labeled.len() >= NON_TRIVIAL_ENTRIES {
        return maybe_union_fallback(labeled, doc, scorer, aggressive);
    }
    let densest = densest_panel_pairs(doc, scorer);
    if densest.len() >= NON_TRIVIAL_ENTRIES {
        return maybe_union_fallback(densest, doc, scorer, aggressive);
    }
    let swept = global_sweep_pairs(doc, scorer);
    if swept.len() >= NON_TRIVIAL_ENTRIES {
        return maybe_union_fallback(swept, doc, scorer, aggressive);
    }
    let fallback = text_fallback_pairs(doc, scorer);
    if fallback.len() >= NON_TRIVIAL_ENTRIES {
        return fallback;
    }
    // Nothing succeeded alone: union everything, earlier strategies first.
    crate::merge!(labeled, densest, swept, fallback)
}

fn maybe_union_fallback(
    mut winner: Vec<(String, String)>,
    doc: &Html,
    scorer: &ContextScorer,
    aggressive: bool,
) -> Vec<(String, String)> {
    if aggressive {
        winner.extend(text_fallback_pairs(doc, scorer));
    }
    winner
}

/// Merge spec pair sources in precedence order (earlier wins per canonical
/// key), canonicalizing keys, normalizing units, removing order-form leaks
/// and decomposing combined dimension strings.
pub fn merge_spec_sources(sources: Vec<Vec<(String, String)>>) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    for source in sources {
        for (key, value) in source {
            let canonical = canonicalize_spec_key(&key);
            let value = normalize_units(&clean(&value));
            if canonical.is_empty()
                || value.is_empty()
                || canonical.len() > MAX_KEY_CHARS
                || value.len() > MAX_VALUE_CHARS
                || is_parts_key(&canonical)
            {
                continue;
            }
            specs.entry(canonical).or_insert(value);
        }
    }
    decompose_dimensions(&mut specs);
    specs
}

/* ---------- strategy 1: labeled specification pane ---------- */

fn labeled_pane_pairs(doc: &Html, scorer: &ContextScorer) -> Vec<(String, String)> {
    // Panes whose own id/class says "spec".
    for pane in doc.select(&PANE_SELECTOR) {
        if scorer.is_noise(&pane) {
            continue;
        }
        let label = format!(
            "{} {}",
            pane.value().attr("id").unwrap_or(""),
            pane.value().attr("class").unwrap_or("")
        );
        if SPEC_LABEL_RE.is_match(&label) {
            let pairs = container_pairs(&pane);
            if !pairs.is_empty() {
                return pairs;
            }
        }
    }
    // Tab labels whose text says "spec", resolved via href/aria-controls.
    for tab in doc.select(&TAB_LABEL_SELECTOR) {
        let text = tab.text().collect::<String>();
        if !SPEC_LABEL_RE.is_match(&text) {
            continue;
        }
        let target = tab
            .value()
            .attr("aria-controls")
            .map(String::from)
            .or_else(|| tab.value().attr("href").map(|h| h.trim_start_matches('#').to_string()));
        let Some(target) = target.filter(|t| !t.is_empty()) else {
            continue;
        };
        let Ok(sel) = Selector::parse(&format!("[id='{}']", target)) else {
            continue;
        };
        if let Some(pane) = doc.select(&sel).next() {
            if scorer.is_noise(&pane) {
                continue;
            }
            let pairs = container_pairs(&pane);
            if !pairs.is_empty() {
                return pairs;
            }
        }
    }
    Vec::new()
}

/* ---------- strategy 2: densest candidate panel ---------- */

fn densest_panel_pairs(doc: &Html, scorer: &ContextScorer) -> Vec<(String, String)> {
    let mut best: Vec<(String, String)> = Vec::new();
    for pane in doc.select(&PANE_SELECTOR) {
        if scorer.is_noise(&pane) {
            continue;
        }
        let pairs = container_pairs(&pane);
        if pairs.len() >= NON_TRIVIAL_ENTRIES && pairs.len() > best.len() {
            best = pairs;
        }
    }
    best
}

/* ---------- strategy 3: global table/definition-list sweep ---------- */

fn global_sweep_pairs(doc: &Html, scorer: &ContextScorer) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for table in doc.select(&TABLE_SELECTOR) {
        if scorer.is_noise(&table) || is_parts_table(&table) {
            continue;
        }
        pairs.extend(table_pairs(&table));
    }
    for dl in doc.select(&DL_SELECTOR) {
        if scorer.is_noise(&dl) {
            continue;
        }
        pairs.extend(dl_pairs(&dl));
    }
    pairs
}

/* ---------- strategy 4: paragraph/list-item text fallback ---------- */

fn text_fallback_pairs(doc: &Html, scorer: &ContextScorer) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for el in doc.select(&P_SELECTOR).chain(doc.select(&LI_SELECTOR)) {
        if scorer.is_noise(&el) || !scorer.in_main_scope(&el) {
            continue;
        }
        let text = clean(&el.text().collect::<String>());
        if let Some(caps) = KV_LINE_RE.captures(&text) {
            pairs.push((caps[1].trim().to_string(), caps[2].trim().to_string()));
        }
    }
    pairs
}

/* ---------- shared container parsing ---------- */

/// Key/value pairs inside one container: two-cell table rows, dt/dd pairs
/// and `key: value` list items.
fn container_pairs(container: &ElementRef) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for table in container.select(&TABLE_SELECTOR) {
        if !is_parts_table(&table) {
            pairs.extend(table_pairs(&table));
        }
    }
    for dl in container.select(&DL_SELECTOR) {
        pairs.extend(dl_pairs(&dl));
    }
    for li in container.select(&LI_SELECTOR) {
        let text = clean(&li.text().collect::<String>());
        if let Some(caps) = KV_LINE_RE.captures(&text) {
            pairs.push((caps[1].trim().to_string(), caps[2].trim().to_string()));
        }
    }
    pairs
}

fn table_pairs(table: &ElementRef) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for row in table.select(&TR_SELECTOR) {
        let cells: Vec<String> = row
            .select(&CELL_SELECTOR)
            .map(|c| clean(&c.text().collect::<String>()))
            .collect();
        if cells.len() == 2 && !cells[0].is_empty() && !cells[1].is_empty() {
            if cells[0].len() <= MAX_KEY_CHARS {
                pairs.push((cells[0].clone(), cells[1].clone()));
            }
        }
    }
    pairs
}

fn dl_pairs(dl: &ElementRef) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut pending_key: Option<String> = None;
    for child in dl.children().filter_map(ElementRef::wrap) {
        let text = clean(&child.text().collect::<String>());
        match child.value().name() {
            "dt" => pending_key = Some(text),
            "dd" => {
                if let Some(key) = pending_key.take() {
                    if !key.is_empty() && !text.is_empty() && key.len() <= MAX_KEY_CHARS {
                        pairs.push((key, text));
                    }
                }
            }
            _ => {}
        }
    }
    pairs
}

/// Parts/accessory order tables: header keywords or a numeric first column.
fn is_parts_table(table: &ElementRef) -> bool {
    let mut rows = table.select(&TR_SELECTOR);
    if let Some(header) = rows.next() {
        let header_hits = header
            .select(&CELL_SELECTOR)
            .map(|c| c.text().collect::<String>())
            .filter(|t| PARTS_HEADER_RE.is_match(t))
            .count();
        if header_hits >= 1 {
            return true;
        }
    }
    // Numeric-first-column heuristic over the body rows.
    let mut total = 0usize;
    let mut numeric = 0usize;
    for row in table.select(&TR_SELECTOR).skip(1) {
        if let Some(first) = row.select(&CELL_SELECTOR).next() {
            let text = clean(&first.text().collect::<String>());
            if text.is_empty() {
                continue;
            }
            total += 1;
            if text.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
                numeric += 1;
            }
        }
    }
    total >= 3 && numeric * 10 >= total * 6
}
