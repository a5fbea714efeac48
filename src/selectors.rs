//! Shared Selectors

use once_cell::sync::Lazy;
use scraper::Selector;

/// Selector for anchor elements with hrefs.
pub static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));

/// Selector for JSON-LD script tags.
pub static JSONLD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type='application/ld+json']").expect("valid jsonld selector")
});

/// Selector for every other script tag (embedded application state).
pub static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("valid script selector"));

/// Selector for `<title>` tags.
pub static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));

/// Selector for metadata tags with name/property attributes.
pub static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name], meta[property]").expect("valid metadata selector"));

/// Selector for image elements.
pub static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid img selector"));

/// Selector for elements carrying an inline style attribute.
pub static STYLED_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[style]").expect("valid style selector"));

/// Selector for tables.
pub static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("valid table selector"));

/// Selector for table rows.
pub static TR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("valid tr selector"));

/// Selector for table cells (header or data).
pub static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("valid cell selector"));

/// Selector for definition lists.
pub static DL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("dl").expect("valid dl selector"));

/// Selector for list items.
pub static LI_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li").expect("valid li selector"));

/// Selector for paragraphs.
pub static P_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("valid p selector"));

/// Selector for top-level microdata product scopes.
pub static MICRODATA_SCOPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemscope]").expect("valid itemscope selector"));

/// Selector for microdata properties.
pub static ITEMPROP_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemprop]").expect("valid itemprop selector"));

/// Selector for RDFa-typed elements.
pub static RDFA_TYPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[typeof]").expect("valid typeof selector"));

/// Selector for RDFa properties.
pub static RDFA_PROP_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[property]").expect("valid property selector"));

/// Selector for embedded document viewers.
pub static VIEWER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("object[data], iframe[src], embed[src]").expect("valid viewer selector")
});

/// Selector for elements with inline onclick handlers.
pub static ONCLICK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[onclick]").expect("valid onclick selector"));
