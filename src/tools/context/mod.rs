mod patterns;


pub use patterns::is_recommendation_path;

use ego_tree::NodeId;
use patterns::{CHROME_RE, CHROME_TAGS, RECO_RE, SCOPE_SELECTORS};
use scraper::{ElementRef, Html};

/// Hard reject: the node sits inside chrome or a cross-sell block.
pub const HARD_REJECT: i32 = -999;

/// Bonus for nodes inside the resolved main product scope.
pub const MAIN_BONUS: i32 = 2;

/// Classifies DOM nodes as main-product content, chrome, or cross-sell
/// noise. Built once per document; every harvester consults it before
/// accepting a candidate.
pub struct ContextScorer {
    main_scope: Option<NodeId>,
    main_only: bool,
}

impl ContextScorer {
    /// Resolve the main product scope: the first matching element among the
    /// ordered scope selectors, falling back to the document root (`None`,
    /// which treats the whole page as main).
    pub fn new(doc: &Html, main_only: bool) -> Self {
        let mut main_scope = None;
        for sel in SCOPE_SELECTORS.iter() {
            if let Some(el) = doc.select(sel).next() {
                main_scope = Some(el.id());
                break;
            }
        }
        Self {
            main_scope,
            main_only,
        }
    }

    /// Score one node by its ancestry.
    ///
    /// `-999` inside chrome (nav/footer/breadcrumb/cookie-consent) or a
    /// recommendation/cross-sell block; otherwise `+2` inside the main
    /// product scope, else `0` (or `-999` when `main_only` is set).
    pub fn score(&self, el: &ElementRef) -> i32 {
        if self.is_noise(el) {
            return HARD_REJECT;
        }
        if self.in_main_scope(el) {
            MAIN_BONUS
        } else if self.main_only {
            HARD_REJECT
        } else {
            0
        }
    }

    /// True when the node or any ancestor matches the chrome or
    /// recommendation pattern sets.
    pub fn is_noise(&self, el: &ElementRef) -> bool {
        self_and_ancestors(el).any(|e| is_chrome_element(&e) || is_recommendation_element(&e))
    }

    /// True when the node or any ancestor matches the recommendation set
    /// specifically (chrome not considered).
    pub fn in_recommendation(&self, el: &ElementRef) -> bool {
        self_and_ancestors(el).any(|e| is_recommendation_element(&e))
    }

    /// True when the node is the resolved main scope or a descendant of it.
    pub fn in_main_scope(&self, el: &ElementRef) -> bool {
        let scope = match self.main_scope {
            Some(id) => id,
            // No scope resolved: the whole document counts as main.
            None => return true,
        };
        if el.id() == scope {
            return true;
        }
        el.ancestors().any(|n| n.id() == scope)
    }
}

fn self_and_ancestors<'a>(el: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    std::iter::once(*el).chain(el.ancestors().filter_map(ElementRef::wrap))
}

fn attr_haystack(el: &ElementRef) -> String {
    let v = el.value();
    let mut hay = String::new();
    if let Some(c) = v.attr("class") {
        hay.push_str(c);
        hay.push(' ');
    }
    if let Some(i) = v.attr("id") {
        hay.push_str(i);
        hay.push(' ');
    }
    if let Some(r) = v.attr("role") {
        hay.push_str(r);
    }
    hay.to_ascii_lowercase()
}

fn is_chrome_element(el: &ElementRef) -> bool {
    if CHROME_TAGS.contains(&el.value().name()) {
        return true;
    }
    let hay = attr_haystack(el);
    !hay.is_empty() && CHROME_RE.is_match(&hay)
}

fn is_recommendation_element(el: &ElementRef) -> bool {
    let hay = attr_haystack(el);
    !hay.is_empty() && RECO_RE.is_match(&hay)
}
