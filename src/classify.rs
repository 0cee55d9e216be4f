#[inline]
pub fn is_smart_double_quote(c: char) -> bool {
    matches!(c, '\u{201C}' | '\u{201D}')
}

#[inline]
pub fn is_smart_single_quote(c: char) -> bool {
    matches!(c, '\u{2018}' | '\u{2019}')
}

#[inline]
pub fn is_nbsp(c: char) -> bool {
    c == '\u{00A0}'
}

/// ASCII replacement for typographic characters LLMs like to emit inside JSON.
#[inline]
pub fn ascii_equivalent(c: char) -> Option<char> {
    if is_smart_double_quote(c) {
        Some('"')
    } else if is_smart_single_quote(c) {
        Some('\'')
    } else if is_nbsp(c) {
        Some(' ')
    } else {
        None
    }
}

#[inline]
pub fn needs_ascii_fold(s: &str) -> bool {
    s.chars().any(|c| ascii_equivalent(c).is_some())
}

/// Tokens meaning "unbounded" for bond and meter fields.
pub fn is_infinity_word(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "∞" | "inf" | "infinity" | "+inf" | "+infinity"
    )
}
