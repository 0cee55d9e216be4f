use crate::classify::{ascii_equivalent, needs_ascii_fold};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern"));

pub(crate) static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*,)+\s*([}\]])").expect("trailing comma pattern"));

/// Cleans a raw tagged block before parsing: drops Markdown code fences,
/// folds smart quotes and non-breaking spaces to ASCII, removes trailing
/// commas before `}`/`]` and trims surrounding whitespace.
///
/// `sanitize(&sanitize(x)) == sanitize(x)` for every input.
pub fn sanitize(raw: &str) -> String {
    let mut text: Cow<'_, str> = Cow::Borrowed(raw);
    // Removing one fence can splice two backtick runs into a new one.
    while FENCE.is_match(&text) {
        text = Cow::Owned(FENCE.replace_all(&text, "").into_owned());
    }
    if needs_ascii_fold(&text) {
        text = Cow::Owned(
            text.chars()
                .map(|c| ascii_equivalent(c).unwrap_or(c))
                .collect(),
        );
    }
    let text = strip_trailing_commas(&text);
    text.trim().to_string()
}

pub(crate) fn strip_trailing_commas(text: &str) -> Cow<'_, str> {
    TRAILING_COMMA.replace_all(text, "$1")
}
