//! Scoring and URL helpers for the image harvester.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// `WxH` in a filename (`widget-800x800.jpg`).
static DIMENSIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2,4})\s*x\s*(\d{2,4})").expect("valid regex"));

/// Width-suffix naming (`hero_1200w.jpg`, `img-640w.webp`).
static WIDTH_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_](\d{2,4})w\b").expect("valid regex"));

/// Size tokens stripped from basenames for crop-dedup.
static SIZE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[-_]?(\d{2,4}x\d{2,4}|\d{2,4}w|small|medium|large|thumb)").expect("valid regex")
});

static THUMBNAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)thumb|icon|swatch|sprite|logo|placeholder|loading|spinner|badge|favicon|pixel")
        .expect("valid regex")
});

static PRODUCT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/products?/|/product[-_]images?/|/media/catalog/|/images/products?/|/gallery/")
        .expect("valid regex")
});

/// CDNs that commonly serve first-party product imagery.
const TRUSTED_CDN_SUFFIXES: &[&str] = &[
    "cloudfront.net",
    "cloudinary.com",
    "imgix.net",
    "akamaized.net",
    "cdn.shopify.com",
    "shopifycdn.com",
    "bigcommerce.com",
    "scene7.com",
    "mm.bing.net",
];

/// Resolve a raw attribute/JSON value to an absolute http(s) image URL.
/// Rejects data/javascript schemes and empty values.
pub(super) fn resolve_image_url(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim().trim_matches('"').trim_matches('\'');
    if raw.is_empty() || raw.starts_with("data:") || raw.starts_with("javascript:") {
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

/// First URL in a srcset-like value (`a.jpg 1x, b.jpg 2x` → `a.jpg`).
pub(super) fn first_srcset_url(raw: &str) -> String {
    raw.split(',')
        .next()
        .unwrap_or(raw)
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

/// `url(...)` operands of inline background-image styles.
pub(super) fn background_image_urls(style: &str) -> Vec<String> {
    static URL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"url\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("valid regex"));
    URL_RE
        .captures_iter(style)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Largest pixel dimension inferable from filename or query hints, if any.
pub(super) fn inferred_dimension(url: &str) -> Option<u32> {
    let parsed = Url::parse(url).ok()?;
    let file = parsed.path_segments()?.last()?.to_string();

    if let Some(caps) = DIMENSIONS_RE.captures(&file) {
        let w: u32 = caps[1].parse().ok()?;
        let h: u32 = caps[2].parse().ok()?;
        return Some(w.max(h));
    }
    if let Some(caps) = WIDTH_SUFFIX_RE.captures(&file) {
        return caps[1].parse().ok();
    }
    for (key, value) in parsed.query_pairs() {
        if matches!(key.as_ref(), "w" | "width" | "h" | "height" | "sz" | "size") {
            if let Ok(px) = value.parse::<u32>() {
                return Some(px);
            }
        }
    }
    None
}

/// Dedup key: lowercased basename with size tokens and extension stripped,
/// so `widget-800x800.jpg` and `widget-400x400.jpg` collapse.
pub(super) fn dedupe_key(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let base = path.rsplit('/').next().unwrap_or(path).to_ascii_lowercase();
    let base = base.rsplit_once('.').map(|(stem, _)| stem.to_string()).unwrap_or(base);
    SIZE_TOKEN_RE.replace_all(&base, "").to_string()
}

pub(super) fn is_thumbnailish(url: &str) -> bool {
    THUMBNAIL_RE.is_match(url)
}

pub(super) fn has_product_path(url: &str) -> bool {
    PRODUCT_PATH_RE.is_match(url)
}

pub(super) fn has_extension(url: &str, ext: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(ext)
}

/// Same registrable host as the page, or a known product-image CDN.
pub(super) fn is_trusted_host(base: &Url, url: &str) -> bool {
    let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(h) => h.to_ascii_lowercase(),
        None => return false,
    };
    if let Some(page_host) = base.host_str() {
        let page_host = page_host.to_ascii_lowercase();
        let bare = |h: &str| h.strip_prefix("www.").map(String::from).unwrap_or_else(|| h.to_string());
        if bare(&host) == bare(&page_host) || host.ends_with(&format!(".{}", bare(&page_host))) {
            return true;
        }
    }
    TRUSTED_CDN_SUFFIXES
        .iter()
        .any(|suffix| host == *suffix || host.ends_with(&format!(".{}", suffix)))
}

/// Tokens from the page URL and product name used to recognize first-party
/// image filenames.
pub(super) struct MatchTokens {
    tokens: Vec<String>,
}

impl MatchTokens {
    pub(super) fn build(base: &Url, product_name: Option<&str>) -> Self {
        let mut tokens = Vec::new();

        // Product code: path tokens that carry a digit (e.g. `obt-3100`).
        if let Some(segments) = base.path_segments() {
            for segment in segments {
                for token in segment.split(|c: char| !c.is_ascii_alphanumeric()) {
                    if token.len() >= 4 && token.chars().any(|c| c.is_ascii_digit()) {
                        tokens.push(token.to_ascii_lowercase());
                    }
                }
            }
        }
        // Title tokens: leading distinctive words of the product name.
        if let Some(name) = product_name {
            tokens.extend(
                name.split(|c: char| !c.is_ascii_alphanumeric())
                    .filter(|t| t.len() >= 4)
                    .take(5)
                    .map(|t| t.to_ascii_lowercase()),
            );
        }
        Self { tokens }
    }

    pub(super) fn matches(&self, url: &str) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        let lower = url.to_ascii_lowercase();
        self.tokens.iter().any(|t| lower.contains(t))
    }
}
