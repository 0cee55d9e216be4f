use crate::number::{BOND_SENTINEL, clamp, parse_bond};
use crate::options::Options;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static LEGACY_BOND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bond\s*:?\s*$").expect("legacy bond pattern"));

fn clean_key(k: &str) -> String {
    k.replace('\u{00A0}', " ").trim().to_string()
}

/// `"Bond"` in any letter case.
pub fn is_bare_bond_key(k: &str) -> bool {
    clean_key(k).eq_ignore_ascii_case("bond")
}

/// Keys such as `"Kita Bond"`, `"Kita Bond:"` or `"Bond:"`, excluding the
/// bare word `Bond`.
pub fn is_legacy_bond_key(k: &str) -> bool {
    let key = clean_key(k);
    LEGACY_BOND.is_match(&key) && !key.eq_ignore_ascii_case("bond")
}

/// Picks the bond for one entity and removes every other spelling from `merged`.
///
/// Precedence on the original object: `bond`, then a bare `Bond`, then the
/// first `"<Name> Bond"` key. Without any of them the template value (if
/// any) stands.
pub(crate) fn resolve_bond(
    original: &Map<String, Value>,
    merged: &mut Map<String, Value>,
    opts: &Options,
) -> f64 {
    let raw = original
        .get("bond")
        .or_else(|| {
            original
                .iter()
                .find(|(k, _)| is_bare_bond_key(k))
                .map(|(_, v)| v)
        })
        .or_else(|| {
            original
                .iter()
                .find(|(k, _)| is_legacy_bond_key(k))
                .map(|(_, v)| v)
        })
        .or_else(|| merged.get("bond"));
    let bond = raw.map(parse_bond).unwrap_or(0.0);
    scrub_bond_keys(merged);
    merged.remove("bond");
    clamp(bond, opts.bond_min(), BOND_SENTINEL)
}

/// Deletes `Bond` and `"<Name> Bond"` keys, keeping canonical `bond`.
pub fn scrub_bond_keys(m: &mut Map<String, Value>) {
    m.retain(|k, _| k == "bond" || !(is_bare_bond_key(k) || is_legacy_bond_key(k)));
}
