//! RDFa product facts (`typeof`/`property` attributes).
//!
//! The same walk as microdata over the other attribute vocabulary: first
//! `Product`-typed element, direct `property` descendants (nested `typeof`
//! scopes excluded except for offer prices), `content` attribute preferred
//! over text.

use super::{parse_price, type_is_product};
use crate::selectors::{RDFA_PROP_SELECTOR, RDFA_TYPE_SELECTOR};
use crate::types::StructuredFacts;
use scraper::{ElementRef, Html};

pub(super) fn extract(doc: &Html) -> Option<StructuredFacts> {
    let scope = doc.select(&RDFA_TYPE_SELECTOR).find(|el| {
        el.value()
            .attr("typeof")
            .map(type_is_product)
            .unwrap_or(false)
    })?;

    let mut facts = StructuredFacts::default();
    let mut nested_price: Option<f64> = None;

    for prop in scope.select(&RDFA_PROP_SELECTOR) {
        let name = match prop.value().attr("property") {
            Some(n) => local_name(n),
            None => continue,
        };
        let value = property_value(&prop);
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if belongs_to_nested_scope(&prop, &scope) {
            if name == "price" && nested_price.is_none() {
                nested_price = parse_price(value);
            }
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
        facts.price = nested_price;
    }

    if facts.is_empty() {
        None
    } else {
        Some(facts)
    }
}

/// `property` values may be CURIEs (`schema:name`); compare the local part.
fn local_name(property: &str) -> &str {
    property.rsplit(':').next().unwrap_or(property)
}

fn belongs_to_nested_scope(prop: &ElementRef, scope: &ElementRef) -> bool {
    let mut current = prop.parent();
    while let Some(node) = current {
        if node.id() == scope.id() {
            return false;
        }
        if let Some(el) = node.value().as_element() {
            if el.attr("typeof").is_some() {
                return true;
            }
        }
        current = node.parent();
    }
    false
}

fn property_value(el: &ElementRef) -> String {
    let v = el.value();
    if let Some(content) = v.attr("content") {
        return content.to_string();
    }
    match v.name() {
        "a" | "link" => v.attr("href").unwrap_or("").to_string(),
        "img" => v.attr("src").unwrap_or("").to_string(),
        _ => el.text().collect::<String>(),
    }
}

fn set_if_empty(target: &mut Option<String>, value: &str) {
    if target.is_none() {
        *target = Some(value.to_string());
    }
}
