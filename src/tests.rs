//! Engine-level tests over synthetic fixture documents.

use crate::engine::extract_product;
use crate::error::ProdexError;
use crate::types::IngestOptions;
use url::Url;

fn page_url() -> Url {
    Url::parse("https://shop.example.com/products/widget-a").expect("valid url")
}

fn opts() -> IngestOptions {
    IngestOptions {
        minpx: Some(200),
        excludepng: Some(false),
        ..IngestOptions::default()
    }
}

#[test]
fn widget_fixture_end_to_end() {
    let html = r#"<html><head>
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Product", "name": "Widget A"}
        </script>
    </head><body>
        <div class="product-gallery">
            <img src="/img/widget-500x500.jpg">
            <img src="/img/widget-thumb-50x50.jpg">
        </div>
        <div class="related-products">
            <table>
                <tr><td>Weight</td><td>10 lb</td></tr>
                <tr><td>Width</td><td>20 in</td></tr>
                <tr><td>Height</td><td>30 in</td></tr>
            </table>
        </div>
    </body></html>"#;

    let extraction = extract_product(html, &page_url(), &opts()).expect("extraction succeeds");
    let record = extraction.record;

    assert_eq!(record.name.as_deref(), Some("Widget A"));
    assert_eq!(record.images.len(), 1);
    assert_eq!(
        record.images[0].url,
        "https://shop.example.com/img/widget-500x500.jpg"
    );
    // The only spec table on the page sits inside a cross-sell block.
    assert!(record.specs.is_empty(), "got {:?}", record.specs);
}

#[test]
fn structured_specs_beat_dom_specs_on_the_same_key() {
    let html = r#"<html><head>
        <script type="application/ld+json">
        {
            "@type": "Product",
            "name": "Walker",
            "additionalProperty": [{"name": "Weight", "value": "12 lb"}]
        }
        </script>
    </head><body><main>
        <table>
            <tr><td>Weight</td><td>99 lb</td></tr>
            <tr><td>Frame</td><td>Steel</td></tr>
        </table>
    </main></body></html>"#;

    let record = extract_product(html, &page_url(), &opts())
        .expect("extraction succeeds")
        .record;
    assert_eq!(record.specs.get("weight").map(String::as_str), Some("12 lb"));
    assert_eq!(record.specs.get("frame").map(String::as_str), Some("Steel"));
}

#[test]
fn script_json_specs_beat_dom_but_lose_to_structured() {
    let html = r#"<html><head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Walker",
         "additionalProperty": [{"name": "Frame", "value": "Aluminum"}]}
        </script>
        <script>window.__STATE__ = {"product": {"attributes": [
            {"name": "Frame", "value": "Titanium"},
            {"name": "Wheels", "value": "6 in"}
        ]}};</script>
    </head><body><main>
        <table>
            <tr><td>Frame</td><td>Steel</td></tr>
            <tr><td>Wheels</td><td>99 in</td></tr>
            <tr><td>Color</td><td>Blue</td></tr>
        </table>
    </main></body></html>"#;

    let record = extract_product(html, &page_url(), &opts())
        .expect("extraction succeeds")
        .record;
    assert_eq!(record.specs.get("frame").map(String::as_str), Some("Aluminum"));
    assert_eq!(record.specs.get("wheels").map(String::as_str), Some("6 in"));
    assert_eq!(record.specs.get("color").map(String::as_str), Some("Blue"));
}

#[test]
fn name_falls_back_to_social_preview_then_heading() {
    let html = r#"<html><head>
        <meta property="og:title" content="Deluxe Shower Chair">
        <title>Deluxe Shower Chair | MegaStore</title>
    </head><body><main>
        <p>A sturdy chair for the shower with adjustable legs and padding.</p>
    </main></body></html>"#;
    let record = extract_product(html, &page_url(), &opts())
        .expect("extraction succeeds")
        .record;
    assert_eq!(record.name.as_deref(), Some("Deluxe Shower Chair"));

    let html_no_meta = r#"<html><head><title>Bed Rail – SafetyFirst</title></head>
    <body><main><h1>Adjustable Bed Rail</h1>
    <p>A rail that keeps sleepers safe through the night, tool-free install.</p>
    </main></body></html>"#;
    let record = extract_product(html_no_meta, &page_url(), &opts())
        .expect("extraction succeeds")
        .record;
    assert_eq!(record.name.as_deref(), Some("Adjustable Bed Rail"));
}

#[test]
fn description_requires_thirty_chars() {
    let html = r#"<html><body><main>
        <h1>Widget</h1>
        <p>Too short.</p>
    </main></body></html>"#;
    let record = extract_product(html, &page_url(), &opts())
        .expect("extraction succeeds")
        .record;
    assert_eq!(record.description, None);
}

#[test]
fn insufficient_pages_error_distinctly() {
    let html = r#"<html><body><nav><a href="/">Home</a></nav></body></html>"#;
    let err = extract_product(html, &page_url(), &opts()).expect_err("must be insufficient");
    assert!(matches!(err, ProdexError::Insufficient));
}

#[test]
fn features_come_from_main_scope_bullets_and_are_bounded() {
    let mut lis = String::new();
    for i in 0..30 {
        lis.push_str(&format!("<li>Highly useful feature number {i} included</li>"));
    }
    let html = format!(
        r#"<html><body><main>
            <h1>Walker</h1>
            <ul>{lis}</ul>
            <ul><li>Frame: Steel</li></ul>
        </main>
        <footer><ul><li>Footer link text that is long enough</li></ul></footer>
        </body></html>"#
    );
    let record = extract_product(&html, &page_url(), &opts())
        .expect("extraction succeeds")
        .record;
    assert!(record.features.len() <= 20);
    assert!(!record.features.iter().any(|f| f.contains("Footer link")));
    // Key/value bullets belong to specs, not features.
    assert!(!record.features.iter().any(|f| f.starts_with("Frame:")));
}

#[test]
fn harvest_false_restricts_to_structured_data() {
    let html = r#"<html><head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Cane", "image": "/img/cane.jpg",
         "description": "A lightweight folding cane with ergonomic handle."}
        </script>
    </head><body><main>
        <img src="/img/dom-only.jpg">
        <a href="/docs/cane-manual.pdf">Manual</a>
        <table><tr><td>Weight</td><td>1 lb</td></tr><tr><td>Color</td><td>Black</td></tr></table>
    </main></body></html>"#;
    let options = IngestOptions {
        harvest: false,
        ..opts()
    };
    let record = extract_product(html, &page_url(), &options)
        .expect("extraction succeeds")
        .record;
    assert_eq!(record.images.len(), 1);
    assert!(record.images[0].url.ends_with("/img/cane.jpg"));
    assert!(record.manuals.is_empty());
    assert!(record.specs.is_empty());
}

#[test]
fn markdown_mode_joins_paragraphs() {
    let html = r#"<html><body><main>
        <h1>Commode</h1>
        <p>First paragraph about the product, long enough to be usable.</p>
        <p>Second paragraph with additional details, also long enough.</p>
    </main></body></html>"#;
    let options = IngestOptions {
        markdown: true,
        ..opts()
    };
    let record = extract_product(html, &page_url(), &options)
        .expect("extraction succeeds")
        .record;
    let description = record.description.expect("description present");
    assert!(description.contains("\n\n"));
}

#[test]
fn debug_mode_surfaces_warnings() {
    let html = r#"<html><body><main><h1>Plain Widget Page</h1>
    <p>Just a heading and one paragraph, nothing structured anywhere here.</p>
    </main></body></html>"#;
    let options = IngestOptions {
        debug: true,
        ..opts()
    };
    let extraction = extract_product(html, &page_url(), &options).expect("extraction succeeds");
    assert!(extraction
        .warnings
        .iter()
        .any(|w| w.starts_with("structured:")));
}
