use super::utils::*;
use super::*;
use crate::tools::context::ContextScorer;
use crate::types::StructuredFacts;
use scraper::Html;
use url::Url;

fn base() -> Url {
    Url::parse("https://shop.example.com/products/widget-3100").expect("valid url")
}

fn harvest(html: &str, facts: &StructuredFacts, min_px: u32) -> Vec<String> {
    let doc = Html::parse_document(html);
    let scorer = ContextScorer::new(&doc, false);
    harvest_images(&doc, facts, &base(), Some("Widget A"), &[], min_px, false, &scorer)
        .into_iter()
        .map(|i| i.url)
        .collect()
}

#[test]
fn gallery_image_beats_generic_and_thumb_is_dropped_by_size() {
    let html = r#"<html><body>
        <div class="product-gallery">
            <img src="/img/widget-500x500.jpg">
            <img src="/img/widget-thumb-50x50.jpg">
        </div>
        <img src="/img/unrelated-banner.jpg">
    </body></html>"#;
    let urls = harvest(html, &StructuredFacts::default(), 200);
    assert_eq!(urls[0], "https://shop.example.com/img/widget-500x500.jpg");
    assert!(!urls.iter().any(|u| u.contains("thumb")));
}

#[test]
fn structured_images_rank_first() {
    let html = r#"<div class="product-gallery"><img src="/img/gallery-shot.jpg"></div>"#;
    let mut facts = StructuredFacts::default();
    facts.images.push("https://shop.example.com/img/hero.jpg".to_string());
    let urls = harvest(html, &facts, 0);
    assert_eq!(urls[0], "https://shop.example.com/img/hero.jpg");
}

#[test]
fn recommendation_block_images_are_rejected() {
    let html = r#"<html><body>
        <div class="product-main"><img src="/img/keep-me.jpg"></div>
        <div class="related-products"><img src="/img/cross-sell.jpg"></div>
    </body></html>"#;
    let urls = harvest(html, &StructuredFacts::default(), 0);
    assert!(urls.iter().any(|u| u.contains("keep-me")));
    assert!(!urls.iter().any(|u| u.contains("cross-sell")));
}

#[test]
fn lazy_attributes_and_background_styles_are_harvested() {
    let html = r#"<html><body><div class="product-main">
        <img data-src="/img/lazy-main.jpg" src="/img/pixel.gif">
        <div style="background-image: url('/img/bg-hero.jpg')"></div>
    </div></body></html>"#;
    let urls = harvest(html, &StructuredFacts::default(), 0);
    assert!(urls.iter().any(|u| u.contains("lazy-main")));
    assert!(urls.iter().any(|u| u.contains("bg-hero")));
}

#[test]
fn same_image_different_crops_collapse_to_best() {
    let html = r#"<div class="product-gallery">
        <img src="/img/widget-800x800.jpg">
        <img src="/img/widget-400x400.jpg">
    </div>"#;
    let urls = harvest(html, &StructuredFacts::default(), 0);
    assert_eq!(
        urls.iter().filter(|u| u.contains("widget-")).count(),
        1
    );
}

#[test]
fn output_is_capped_at_twelve() {
    let mut html = String::from(r#"<div class="product-gallery">"#);
    for i in 0..20 {
        html.push_str(&format!(r#"<img src="/img/shot-{i}-unique.jpg">"#));
    }
    html.push_str("</div>");
    let urls = harvest(&html, &StructuredFacts::default(), 0);
    assert!(urls.len() <= MAX_IMAGES);
}

#[test]
fn fallback_sweeps_main_scope_when_primary_is_empty() {
    // Every candidate falls under the pixel threshold, so the weighted pass
    // keeps nothing; the main-scope fallback still surfaces the one image.
    let html = r#"<html><body>
        <main><img src="/img/only-shot-100x100.jpg"></main>
        <footer><img src="/img/footer-logo-100x100.jpg"></footer>
    </body></html>"#;
    let doc = Html::parse_document(html);
    let scorer = ContextScorer::new(&doc, false);
    let urls = harvest_images(
        &doc,
        &StructuredFacts::default(),
        &base(),
        None,
        &[],
        200,
        false,
        &scorer,
    );
    assert_eq!(urls.len(), 1);
    assert!(urls[0].url.contains("only-shot"));
}

#[test]
fn infers_dimensions_from_filenames_and_queries() {
    assert_eq!(inferred_dimension("https://a.com/p/w-800x600.jpg"), Some(800));
    assert_eq!(inferred_dimension("https://a.com/p/hero_1200w.jpg"), Some(1200));
    assert_eq!(inferred_dimension("https://a.com/p/img.jpg?width=640"), Some(640));
    assert_eq!(inferred_dimension("https://a.com/p/img.jpg"), None);
}

#[test]
fn resolves_relative_and_protocol_relative_urls() {
    let b = base();
    assert_eq!(
        resolve_image_url(&b, "/img/a.jpg").as_deref(),
        Some("https://shop.example.com/img/a.jpg")
    );
    assert_eq!(
        resolve_image_url(&b, "//cdn.other.com/a.jpg").as_deref(),
        Some("https://cdn.other.com/a.jpg")
    );
    assert!(resolve_image_url(&b, "data:image/png;base64,xyz").is_none());
}
