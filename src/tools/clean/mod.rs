mod utils;

#[cfg(test)]
mod tests;

use utils::*;

/// Clean extracted text.
///
/// Performs the following operations in order:
/// 1. Decode HTML entities (`&amp;` → `&`, `&#39;` → `'`)
/// 2. Normalize Unicode to NFC (canonical composition)
/// 3. Remove zero-width characters
/// 4. Remove control characters (except newlines/tabs)
/// 5. Normalize whitespace (collapse multiple spaces, trim)
///
/// # Examples
/// ```
/// use prodex::tools::clean::clean;
///
/// let dirty = "Stainless &amp; Steel   Cart&#8203;";
/// assert_eq!(clean(dirty), "Stainless & Steel Cart");
/// ```
pub fn clean(text: &str) -> String {
    let mut result = text.to_string();
    result = decode_html_entities(&result);
    result = normalize_unicode(&result);
    result = remove_zero_width_chars(&result);
    result = remove_control_chars(&result);
    result = normalize_whitespace(&result);
    result
}

/// Clean all text strings in a collection.
pub fn clean_all(texts: &[String]) -> Vec<String> {
    texts.iter().map(|t| clean(t)).collect()
}

/// Best-effort Latin-script filter for feature lines.
///
/// Returns true when at least 70% of the alphabetic characters are ASCII or
/// Latin-1/Latin-Extended. Digits, punctuation and whitespace are neutral.
pub fn is_mostly_latin(text: &str) -> bool {
    let mut alpha = 0usize;
    let mut latin = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            alpha += 1;
            if c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c) {
                latin += 1;
            }
        }
    }
    if alpha == 0 {
        return true;
    }
    latin * 10 >= alpha * 7
}
