use super::*;

#[test]
fn clean_decodes_entities_and_collapses_whitespace() {
    assert_eq!(
        clean("Overbed   Table &amp; Tray&#8203;"),
        "Overbed Table & Tray"
    );
    assert_eq!(clean("  12&quot; Wheels  "), "12\" Wheels");
}

#[test]
fn clean_strips_control_chars_but_keeps_text() {
    assert_eq!(clean("Bed\u{0000} Rail"), "Bed Rail");
    assert_eq!(clean("line\nbreak"), "line break");
}

#[test]
fn clean_normalizes_composed_forms() {
    let precomposed = "Caf\u{00E9}";
    let decomposed = "Cafe\u{0301}";
    assert_eq!(clean(precomposed), clean(decomposed));
}

#[test]
fn clean_all_maps_every_entry() {
    let texts = vec!["a &amp; b".to_string(), "  c  ".to_string()];
    assert_eq!(clean_all(&texts), vec!["a & b", "c"]);
}

#[test]
fn latin_filter_accepts_english_and_accents() {
    assert!(is_mostly_latin("Height adjustable from 28\" to 45\""));
    assert!(is_mostly_latin("Chaise longue réglable"));
    assert!(is_mostly_latin("100% — 240V"));
}

#[test]
fn latin_filter_rejects_non_latin_lines() {
    assert!(!is_mostly_latin("完全に調整可能なベッドレール"));
    assert!(!is_mostly_latin("регулируемая высота"));
}
