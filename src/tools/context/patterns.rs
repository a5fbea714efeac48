//! Curated pattern tables for the scope/noise classifier. Process-wide
//! immutable configuration, loaded once.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

/// Tags that are chrome wherever they appear.
pub(super) const CHROME_TAGS: &[&str] = &["nav", "footer"];

/// Class/id/ARIA-role fragments that mark chrome regions.
pub(super) static CHROME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        breadcrumb | cookie | consent | gdpr |
        site-header | site-footer | page-footer | global-header |
        navbar | nav-menu | mega-menu | main-nav | top-bar | utility-bar |
        skip-link | minicart | mini-cart |
        \bnavigation\b | \bbanner\b | contentinfo",
    )
    .expect("valid chrome pattern")
});

/// Class/id fragments that mark recommendation / cross-sell blocks.
pub(super) static RECO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        related | upsell | up-sell | cross-sell | crosssell |
        frequently-bought | frequently_bought | fbt |
        also-viewed | also_viewed | also-bought | also_bought |
        recommend | similar-products | similar_items |
        you-may | recently-viewed | recently_viewed",
    )
    .expect("valid recommendation pattern")
});

/// Ordered scope selectors: explicit product microdata first, then product
/// containers, then media containers, then generic landmarks.
const SCOPE_SELECTOR_STRINGS: &[&str] = &[
    "[itemscope][itemtype*='Product']",
    "[id^='product']",
    ".product-detail",
    ".product-main",
    ".product-page",
    ".pdp",
    ".product",
    "#product",
    ".product-gallery",
    ".gallery",
    ".product-media",
    "main",
    "article",
    "[role='main']",
];

pub(super) static SCOPE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    SCOPE_SELECTOR_STRINGS
        .iter()
        .map(|s| Selector::parse(s).expect("valid scope selector"))
        .collect()
});

/// True when a joined JSON key path looks like a recommendation block
/// (used by the script-JSON walker, which has no DOM ancestry to consult).
pub fn is_recommendation_path(path: &str) -> bool {
    RECO_RE.is_match(&path.to_ascii_lowercase())
}
