use super::*;
use crate::normalize::{is_legacy_bond_key, scrub_bond_keys};
use crate::number::{BOND_SENTINEL, parse_bond_text};

fn party_bond(entity: Value, opts: &Options) -> Entity {
    normalize_state(&json!({ "party": [entity] }), opts)
        .party
        .remove(0)
}

#[test]
fn named_bond_key_with_fraction() {
    let e = party_bond(json!({"name": "Kita", "Kita Bond": "15/100"}), &Options::default());
    assert_eq!(e.bond, 15.0);
    assert!(e.extra.keys().all(|k| !is_legacy_bond_key(k)));
    assert!(e.extra.is_empty());
}

#[test]
fn legacy_key_variants() {
    for key in ["Kita Bond", "Kita Bond:", "kita bond ", "Kita\u{00A0}Bond", "Bond:"] {
        assert!(is_legacy_bond_key(key), "{key:?} should be legacy");
    }
    for key in ["Bond", "bond", "Bondage", "bonded", "name"] {
        assert!(!is_legacy_bond_key(key), "{key:?} should not be legacy");
    }
}

#[test]
fn bare_capital_bond_is_migrated() {
    let e = party_bond(json!({"Bond": 42}), &Options::default());
    assert_eq!(e.bond, 42.0);
    assert!(!e.extra.contains_key("Bond"));
}

#[test]
fn canonical_bond_wins_and_aliases_are_scrubbed() {
    let e = party_bond(
        json!({"bond": 10, "Bond": 90, "Kita Bond": 70}),
        &Options::default(),
    );
    assert_eq!(e.bond, 10.0);
    assert!(e.extra.is_empty());
}

#[test]
fn infinity_tokens_map_to_the_sentinel() {
    for token in ["∞", "inf", "Infinity", " +INF "] {
        let e = party_bond(json!({ "bond": token }), &Options::default());
        assert_eq!(e.bond, BOND_SENTINEL, "token {token:?}");
    }
}

#[test]
fn sentinel_exports_as_glyph() {
    let s = normalize(json!({"bond": "∞", "party": [{"bond": "∞"}, {"bond": 50}]}));
    let v = export_value(&s).unwrap();
    assert_eq!(v["bond"], json!("∞"));
    assert_eq!(v["party"][0]["bond"], json!("∞"));
    assert_eq!(v["party"][1]["bond"], json!(50));
}

#[test]
fn bond_is_capped_above() {
    let e = party_bond(json!({"bond": 150}), &Options::default());
    assert_eq!(e.bond, BOND_SENTINEL);
}

#[test]
fn negative_bond_depends_on_floor() {
    let e = party_bond(json!({"bond": -20}), &Options::default());
    assert_eq!(e.bond, -20.0);

    let zero = Options {
        bond_floor: BondFloor::Zero,
        ..Default::default()
    };
    let e = party_bond(json!({"bond": -20}), &zero);
    assert_eq!(e.bond, 0.0);
}

#[test]
fn unreadable_bond_is_zero() {
    let e = party_bond(json!({"bond": "friendly"}), &Options::default());
    assert_eq!(e.bond, 0.0);
    let e = party_bond(json!({"bond": null}), &Options::default());
    assert_eq!(e.bond, 0.0);
}

#[test]
fn bond_text_forms() {
    assert_eq!(parse_bond_text("15/100"), 15.0);
    assert_eq!(parse_bond_text(" 15/100 "), 15.0);
    assert_eq!(parse_bond_text("33.5"), 33.5);
    assert_eq!(parse_bond_text("∞"), BOND_SENTINEL);
    assert_eq!(parse_bond_text(""), 0.0);
    assert_eq!(parse_bond_text("high"), 0.0);
}

#[test]
fn scrub_keeps_canonical_bond() {
    let mut m = json!({"bond": 1, "Bond": 2, "Ann Bond": 3, "other": 4})
        .as_object()
        .cloned()
        .unwrap();
    scrub_bond_keys(&mut m);
    let keys: Vec<&str> = m.keys().map(String::as_str).collect();
    assert_eq!(keys, ["bond", "other"]);
}
