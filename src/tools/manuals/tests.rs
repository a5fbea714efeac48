use super::*;
use crate::tools::context::ContextScorer;
use scraper::Html;
use url::Url;

fn base() -> Url {
    Url::parse("https://shop.example.com/products/rollator-r8").expect("valid url")
}

fn harvest(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let scorer = ContextScorer::new(&doc, false);
    harvest_manuals(&doc, &base(), Some("Rollator R8"), &[], &scorer)
}

#[test]
fn finds_pdf_anchors_and_viewers() {
    let html = r#"<html><body><main>
        <a href="/docs/rollator-r8-user-manual.pdf">User manual</a>
        <iframe src="/docs/rollator-r8-quick-start.pdf"></iframe>
    </main></body></html>"#;
    let urls = harvest(html);
    assert_eq!(urls.len(), 2);
    assert!(urls[0].contains("rollator-r8"));
}

#[test]
fn keyword_links_without_pdf_extension_count() {
    let html = r#"<main><a href="/downloads/assembly-instructions">Assembly instructions</a></main>"#;
    let urls = harvest(html);
    assert_eq!(urls.len(), 1);
}

#[test]
fn regulatory_documents_are_denied() {
    let html = r#"<main>
        <a href="/docs/iso-13485-certificate.pdf">ISO certificate</a>
        <a href="/docs/warranty-statement.pdf">Warranty</a>
        <a href="/docs/user-manual.pdf">Manual</a>
    </main>"#;
    let urls = harvest(html);
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("user-manual"));
}

#[test]
fn onclick_embedded_urls_are_extracted() {
    let html = r#"<main><button onclick="window.open('/docs/datasheet.pdf')">Datasheet</button></main>"#;
    let urls = harvest(html);
    assert_eq!(urls, vec!["https://shop.example.com/docs/datasheet.pdf"]);
}

#[test]
fn duplicates_collapse_on_path_ignoring_query_and_fragment() {
    let html = r#"<main>
        <a href="/docs/manual.pdf?v=1">Manual</a>
        <a href="/docs/manual.pdf?v=2#page=3">Manual again</a>
    </main>"#;
    let urls = harvest(html);
    assert_eq!(urls.len(), 1);
}

#[test]
fn product_token_in_url_ranks_first() {
    let html = r#"<main>
        <a href="/docs/generic-line-brochure.pdf">Brochure</a>
        <a href="/docs/rollator-r8-manual.pdf">Manual</a>
    </main>"#;
    let urls = harvest(html);
    assert!(urls[0].contains("rollator-r8"));
}

#[test]
fn cross_sell_documents_are_rejected() {
    // Off-host so the same-hostname fallback sweep cannot resurface it.
    let doc = Html::parse_document(
        r#"<html><body>
            <main><p>nothing</p></main>
            <div class="related-products">
                <a href="https://elsewhere.example.net/docs/other-manual.pdf">Manual</a>
            </div>
        </body></html>"#,
    );
    let scorer = ContextScorer::new(&doc, false);
    let urls = harvest_manuals(&doc, &base(), None, &[], &scorer);
    assert!(urls.is_empty());
}

#[test]
fn script_payload_documents_are_included() {
    let doc = Html::parse_document("<main><p>empty page</p></main>");
    let scorer = ContextScorer::new(&doc, false);
    let payloads = vec![serde_json::json!({
        "downloads": [{"url": "https://shop.example.com/files/rollator-r8-ifu.pdf"}]
    })];
    let urls = harvest_manuals(&doc, &base(), None, &payloads, &scorer);
    assert_eq!(urls.len(), 1);
}
