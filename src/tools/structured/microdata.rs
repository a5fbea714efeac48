//! Microdata product facts (`itemscope`/`itemtype`/`itemprop`).
//!
//! Scopes to the first `Product`-typed `itemscope` and reads its direct
//! properties, excluding anything owned by a nested scope (an Offer's
//! `name` must not become the product name).

use super::{parse_price, type_is_product};
use crate::selectors::{ITEMPROP_SELECTOR, MICRODATA_SCOPE_SELECTOR};
use crate::types::StructuredFacts;
use scraper::{ElementRef, Html};

pub(super) fn extract(doc: &Html) -> Option<StructuredFacts> {
    let scope = doc.select(&MICRODATA_SCOPE_SELECTOR).find(|el| {
        el.value()
            .attr("itemtype")
            .map(type_is_product)
            .unwrap_or(false)
    })?;

    let mut facts = StructuredFacts::default();
    let mut in_offer_scope: Vec<(String, String)> = Vec::new();

    for prop in scope.select(&ITEMPROP_SELECTOR) {
        let name = match prop.value().attr("itemprop") {
            Some(n) => n,
            None => continue,
        };
        let nested = belongs_to_nested_scope(&prop, &scope);
        let value = property_value(&prop);
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if nested {
            // Keep offer-scoped price reachable; drop everything else.
            in_offer_scope.push((name.to_string(), value.to_string()));
            continue;
        }
        match name {
            "name" => set_if_empty(&mut facts.name, value),
            "description" => set_if_empty(&mut facts.description, value),
            "brand" => set_if_empty(&mut facts.brand, value),
            "sku" | "mpn" => set_if_empty(&mut facts.sku, value),
            "price" => {
                if facts.price.is_none() {
                    facts.price = parse_price(value);
                }
            }
            "image" => {
                if !facts.images.iter().any(|u| u == value) {
                    facts.images.push(value.to_string());
                }
            }
            _ => {}
        }
    }

    if facts.price.is_none() {
        if let Some((_, raw)) = in_offer_scope.iter().find(|(n, _)| n == "price") {
            facts.price = parse_price(raw);
        }
    }

    if facts.is_empty() {
        None
    } else {
        Some(facts)
    }
}

/// Walk parents until the product scope; hitting another `itemscope` first
/// means this property belongs to the nested item.
fn belongs_to_nested_scope(prop: &ElementRef, scope: &ElementRef) -> bool {
    let mut current = prop.parent();
    while let Some(node) = current {
        if node.id() == scope.id() {
            return false;
        }
        if let Some(el) = node.value().as_element() {
            if el.attr("itemscope").is_some() {
                return true;
            }
        }
        current = node.parent();
    }
    false
}

/// Property value per element kind, as the microdata model defines it.
fn property_value(el: &ElementRef) -> String {
    let v = el.value();
    match v.name() {
        "meta" => v.attr("content").unwrap_or("").to_string(),
        "link" | "a" | "area" => v.attr("href").unwrap_or("").to_string(),
        "img" | "audio" | "video" | "source" => v.attr("src").unwrap_or("").to_string(),
        "data" | "meter" => v.attr("value").unwrap_or("").to_string(),
        "time" => v
            .attr("datetime")
            .map(String::from)
            .unwrap_or_else(|| el.text().collect::<String>()),
        _ => v
            .attr("content")
            .map(String::from)
            .unwrap_or_else(|| el.text().collect::<String>()),
    }
}

fn set_if_empty(target: &mut Option<String>, value: &str) {
    if target.is_none() {
        *target = Some(value.to_string());
    }
}
