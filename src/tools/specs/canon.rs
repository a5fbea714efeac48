//! Spec key canonicalization and unit normalization. Process-wide immutable
//! tables, loaded once.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Synonym table: normalized key → canonical key. Every target is its own
/// fixed point so canonicalization is idempotent.
static SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("wt", "weight"),
        ("item_weight", "weight"),
        ("product_weight", "weight"),
        ("unit_weight", "weight"),
        ("net_weight", "weight"),
        ("max_weight", "weight_capacity"),
        ("maximum_weight", "weight_capacity"),
        ("weight_limit", "weight_capacity"),
        ("safe_working_load", "weight_capacity"),
        ("dims", "dimensions"),
        ("dimension", "dimensions"),
        ("product_dimensions", "overall_dimensions"),
        ("overall_dimension", "overall_dimensions"),
        ("overall_size", "overall_dimensions"),
        ("w_x_d_x_h", "overall_dimensions"),
        ("width_overall", "overall_width"),
        ("depth_overall", "overall_depth"),
        ("height_overall", "overall_height"),
        ("model", "model_number"),
        ("model_no", "model_number"),
        ("model_num", "model_number"),
        ("item_number", "sku"),
        ("item_no", "sku"),
        ("mfg", "manufacturer"),
        ("mfr", "manufacturer"),
        ("made_by", "manufacturer"),
        ("brand_name", "brand"),
        ("colour", "color"),
        ("colours", "color"),
        ("colors", "color"),
        ("materials", "material"),
        ("material_composition", "material"),
        ("warranty_period", "warranty"),
        ("pkg_qty", "package_quantity"),
    ])
});

/// Keys that belong to order forms, not specifications. Removed after the
/// merge regardless of which harvester leaked them.
static PARTS_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(qty|quantity|part_no|part_number|order|order_no|item|price|each|add_to_cart)$")
        .expect("valid regex")
});

static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Canonicalize one spec key: synonym-table lookup after lowercasing,
/// stripping punctuation and underscore-joining. Idempotent.
pub fn canonicalize_spec_key(key: &str) -> String {
    let lowered = key.trim().to_lowercase();
    let normalized = NON_ALNUM_RE
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string();
    match SYNONYMS.get(normalized.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized,
    }
}

/// True for canonical keys that only make sense in a parts/order table.
pub fn is_parts_key(canonical: &str) -> bool {
    PARTS_KEY_RE.is_match(canonical)
}

static UNIT_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let rule = |pat: &str, rep: &'static str| {
        (
            Regex::new(&format!(r"(?i)(\d(?:[\d.,]*\d)?)\s*(?:{})\b\.?", pat)).expect("valid regex"),
            rep,
        )
    };
    vec![
        rule("pounds?|lbs?", "$1 lb"),
        rule("ounces?|ozs?", "$1 oz"),
        rule("inches|inch", "$1 in"),
        rule("feet|foot", "$1 ft"),
        rule("centimetres?|centimeters?", "$1 cm"),
        rule("millimetres?|millimeters?", "$1 mm"),
        rule("kilograms?|kgs", "$1 kg"),
        rule("grams?", "$1 g"),
    ]
});

/// Standardize unit words that follow a number (`25 pounds` → `25 lb`).
pub fn normalize_units(value: &str) -> String {
    let mut out = value.to_string();
    for (re, rep) in UNIT_RULES.iter() {
        out = re.replace_all(&out, *rep).to_string();
    }
    out
}

static DIM_TRIPLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?ix)
        ([\d.]+)\s*(?:in|cm|mm|")?\s*[x×]\s*
        ([\d.]+)\s*(?:in|cm|mm|")?\s*[x×]\s*
        ([\d.]+)\s*(in|cm|mm|")?"#,
    )
    .expect("valid regex")
});

/// Decompose a combined `W × D × H` dimension string into derived
/// width/depth/height entries when the split keys are absent.
pub fn decompose_dimensions(specs: &mut BTreeMap<String, String>) {
    let combined = ["overall_dimensions", "dimensions"]
        .iter()
        .find_map(|k| specs.get(*k).cloned());
    let combined = match combined {
        Some(c) => c,
        None => return,
    };
    let caps = match DIM_TRIPLE_RE.captures(&combined) {
        Some(c) => c,
        None => return,
    };
    let unit = caps.get(4).map(|m| m.as_str().to_string());
    let with_unit = |n: &str| match &unit {
        Some(u) if u == "\"" => format!("{} in", n),
        Some(u) => format!("{} {}", n, u),
        None => n.to_string(),
    };
    for (key, idx) in [("overall_width", 1), ("overall_depth", 2), ("overall_height", 3)] {
        if !specs.contains_key(key) {
            specs.insert(key.to_string(), with_unit(&caps[idx]));
        }
    }
}
