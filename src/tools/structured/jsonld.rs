//! JSON-LD product facts.
//!
//! One page may carry several `application/ld+json` blocks, each encoding a
//! single entity, an array, or an `@graph`. Blocks are parsed independently
//! so one malformed block cannot abort the others; the first plausible
//! Product entity wins.

use super::{parse_price, type_is_product};
use crate::selectors::JSONLD_SELECTOR;
use crate::tools::types::Jsonld;
use crate::types::StructuredFacts;
use scraper::Html;
use serde_json::Value;

pub(super) fn extract(doc: &Html) -> Option<StructuredFacts> {
    for script in doc.select(&JSONLD_SELECTOR) {
        let raw = script.text().collect::<String>();
        let Some(entities) = parse_block(&raw) else {
            continue;
        };
        for entity in &entities {
            if is_plausible_product(entity) {
                return Some(facts_from_entity(entity));
            }
        }
    }
    None
}

/// Parse one block, tolerating the common unbracketed-list malformation.
fn parse_block(raw: &str) -> Option<Jsonld> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        return Some(flatten(v));
    }
    let bracketed = format!("[{}]", raw);
    serde_json::from_str::<Value>(&bracketed).ok().map(flatten)
}

/// Flatten arrays and `@graph` wrappers into a flat entity list.
fn flatten(value: Value) -> Jsonld {
    let mut out = Vec::new();
    match value {
        Value::Array(arr) => {
            for item in arr {
                out.extend(flatten(item));
            }
        }
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                out.extend(flatten(graph));
                if !obj.is_empty() {
                    out.push(Value::Object(obj));
                }
            } else {
                out.push(Value::Object(obj));
            }
        }
        other => out.push(other),
    }
    out
}

/// Product-typed, or untyped but carrying name plus offer/sku evidence.
fn is_plausible_product(entity: &Value) -> bool {
    let obj = match entity.as_object() {
        Some(o) => o,
        None => return false,
    };
    match obj.get("@type") {
        Some(Value::String(t)) if type_is_product(t) => return true,
        Some(Value::Array(types)) => {
            if types
                .iter()
                .filter_map(Value::as_str)
                .any(type_is_product)
            {
                return true;
            }
        }
        _ => {}
    }
    obj.get("name").and_then(Value::as_str).is_some()
        && (obj.contains_key("offers") || obj.contains_key("sku"))
}

fn facts_from_entity(entity: &Value) -> StructuredFacts {
    let mut facts = StructuredFacts::default();
    facts.name = string_field(entity, "name");
    facts.description = string_field(entity, "description");
    facts.brand = brand_field(entity);
    facts.sku = sku_field(entity);
    facts.price = offer_price(entity);
    facts.images = image_urls(entity.get("image"));

    if let Some(props) = entity.get("additionalProperty").and_then(Value::as_array) {
        for prop in props {
            let name = prop.get("name").and_then(Value::as_str);
            let value = prop.get("value").map(scalar_to_string);
            if let (Some(name), Some(Some(value))) = (name, value) {
                if !name.trim().is_empty() && !value.trim().is_empty() {
                    facts
                        .specs
                        .insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }
    }

    facts
}

fn string_field(entity: &Value, key: &str) -> Option<String> {
    entity
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn brand_field(entity: &Value) -> Option<String> {
    match entity.get("brand") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        _ => None,
    }
}

fn sku_field(entity: &Value) -> Option<String> {
    match entity.get("sku") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Price from the first offer (object or array form).
fn offer_price(entity: &Value) -> Option<f64> {
    let offers = entity.get("offers")?;
    let offer = match offers {
        Value::Array(arr) => arr.first()?,
        other => other,
    };
    match offer.get("price") {
        Some(Value::String(s)) => parse_price(s),
        Some(Value::Number(n)) => n.as_f64().filter(|p| *p >= 0.0),
        _ => None,
    }
}

/// `image` as string, array of strings/objects, or a single ImageObject.
fn image_urls(image: Option<&Value>) -> Vec<String> {
    let mut urls = Vec::new();
    match image {
        Some(Value::String(s)) => push_url(&mut urls, s),
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(s) => push_url(&mut urls, s),
                    Value::Object(_) => {
                        if let Some(u) = object_url(item) {
                            push_url(&mut urls, &u);
                        }
                    }
                    _ => {}
                }
            }
        }
        Some(obj @ Value::Object(_)) => {
            if let Some(u) = object_url(obj) {
                push_url(&mut urls, &u);
            }
        }
        _ => {}
    }
    urls
}

fn object_url(obj: &Value) -> Option<String> {
    ["url", "contentUrl"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(String::from)
}

fn push_url(urls: &mut Vec<String>, url: &str) {
    let url = url.trim();
    if !url.is_empty() && !urls.iter().any(|u| u == url) {
        urls.push(url.to_string());
    }
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
