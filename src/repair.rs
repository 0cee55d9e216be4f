//! Best-effort textual repair of model-written state JSON.
//!
//! This is not a JSON parser. Each [`RepairRule`] targets one malformation
//! class seen in generated `<rpg_state>` blocks and rewrites only text that
//! matches it. Rules run in table order; later rules assume earlier ones
//! already normalized the text. The output is not guaranteed to parse.

use crate::options::Options;
use crate::sanitize::{sanitize, strip_trailing_commas};
use memchr::memmem;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Fields whose values are always numbers. Only these are de-quoted, so free
/// text that happens to contain digits is never rewritten.
pub const NUMERIC_FIELDS: &[&str] = &[
    "hp_curr", "hp_max", "mp_curr", "mp_max", "en_curr", "en_max", "day", "round", "dankcoin",
    "bond",
];

/// Array fields that hold flat lists of strings (or item objects).
pub const LIST_FIELDS: &[&str] = &[
    "skills",
    "inventory",
    "passives",
    "quests",
    "env_effects",
    "status_effects",
];

pub struct RepairRule {
    pub name: &'static str,
    apply: fn(&str) -> Cow<'_, str>,
}

impl RepairRule {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        (self.apply)(text)
    }
}

impl std::fmt::Debug for RepairRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairRule").field("name", &self.name).finish()
    }
}

/// The repair pass, in application order.
pub static REPAIR_RULES: &[RepairRule] = &[
    RepairRule {
        name: "closed quote after checkbox marker",
        apply: close_marker_quotes,
    },
    RepairRule {
        name: "removed comma inside clock/month",
        apply: fix_time_commas,
    },
    RepairRule {
        name: "unquoted numeric field",
        apply: unquote_numbers,
    },
    RepairRule {
        name: "removed stray quote next to number",
        apply: strip_stray_number_quotes,
    },
    RepairRule {
        name: "quoted bare month/clock",
        apply: quote_time_tokens,
    },
    RepairRule {
        name: "normalized bond fraction",
        apply: bond_fraction,
    },
    RepairRule {
        name: "split broken list strings",
        apply: fix_list_fields,
    },
    RepairRule {
        name: "removed trailing comma",
        apply: strip_trailing_commas,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairLogEntry {
    /// Byte offset of the first change the rule made.
    pub position: usize,
    pub message: &'static str,
    pub context: String,
}

#[derive(Default)]
struct Logger {
    enable: bool,
    window: usize,
    entries: Vec<RepairLogEntry>,
}

impl Logger {
    fn record(&mut self, message: &'static str, before: &str, after: &str) {
        if !self.enable {
            return;
        }
        let position = before
            .bytes()
            .zip(after.bytes())
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| before.len().min(after.len()));
        let position = floor_char_boundary(after, position);
        self.entries.push(RepairLogEntry {
            position,
            message,
            context: build_context(after, position, self.window),
        });
    }
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn build_context(text: &str, pos: usize, win: usize) -> String {
    let before: Vec<char> = text[..pos].chars().rev().take(win).collect();
    let mut s: String = before.into_iter().rev().collect();
    s.extend(text[pos..].chars().take(win));
    s
}

/// Sanitizes `raw` and runs every repair rule over it.
pub fn repair(raw: &str) -> String {
    run(raw, &mut Logger::default())
}

/// Like [`repair`], also returning one log entry per rule that changed the text.
pub fn repair_with_log(raw: &str, opts: &Options) -> (String, Vec<RepairLogEntry>) {
    let mut logger = Logger {
        enable: opts.logging,
        window: opts.log_context_window,
        entries: Vec::new(),
    };
    let out = run(raw, &mut logger);
    (out, logger.entries)
}

fn run(raw: &str, logger: &mut Logger) -> String {
    let mut text = sanitize(raw);
    for rule in REPAIR_RULES {
        let next = match rule.apply(&text) {
            Cow::Owned(next) if next != text => next,
            _ => continue,
        };
        logger.record(rule.name, &text, &next);
        text = next;
    }
    text
}

fn field_alternation(fields: &[&str]) -> String {
    fields.join("|")
}

static MARKER_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[([xX])\]\s*,\s*""#).expect("marker pattern"));

fn close_marker_quotes(text: &str) -> Cow<'_, str> {
    MARKER_QUOTE.replace_all(text, r#"[$1]",""#)
}

// `"month":"Jan,"day":3` lost its closing quote; `"clock":"12:00,"}` gained a comma.
static TIME_COMMA_BEFORE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:clock|month)"\s*:\s*")([^",]*?),"(\s*[A-Za-z_]\w*"\s*:)"#)
        .expect("time comma pattern")
});
static TIME_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:clock|month)"\s*:\s*")([^"]*?),(")"#).expect("time comma pattern")
});

fn fix_time_commas(text: &str) -> Cow<'_, str> {
    let step = TIME_COMMA_BEFORE_KEY.replace_all(text, r#"${1}${2}","${3}"#);
    match step {
        Cow::Borrowed(t) => TIME_COMMA.replace_all(t, "${1}${2}${3}"),
        Cow::Owned(t) => Cow::Owned(TIME_COMMA.replace_all(&t, "${1}${2}${3}").into_owned()),
    }
}

static QUOTED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""({})"\s*:\s*"\s*(-?\d+(?:\.\d+)?)\s*"\s*([,}}\]])"#,
        field_alternation(NUMERIC_FIELDS)
    ))
    .expect("quoted number pattern")
});

fn unquote_numbers(text: &str) -> Cow<'_, str> {
    QUOTED_NUMBER.replace_all(text, r#""${1}":${2}${3}"#)
}

static TRAILING_NUMBER_QUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""({}|curr|max)"\s*:\s*(-?\d+(?:\.\d+)?)\s*"\s*([,}}\]])"#,
        field_alternation(NUMERIC_FIELDS)
    ))
    .expect("trailing quote pattern")
});
static LEADING_NUMBER_QUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""({}|curr|max)"\s*:\s*"\s*(-?\d+(?:\.\d+)?)\s*([,}}\]])"#,
        field_alternation(NUMERIC_FIELDS)
    ))
    .expect("leading quote pattern")
});

// `"hp_curr":225"` and `"day":"1,"clock"` both carry one unmatched quote.
fn strip_stray_number_quotes(text: &str) -> Cow<'_, str> {
    let step = TRAILING_NUMBER_QUOTE.replace_all(text, r#""${1}":${2}${3}"#);
    match step {
        Cow::Borrowed(t) => LEADING_NUMBER_QUOTE.replace_all(t, r#""${1}":${2}${3}"#),
        Cow::Owned(t) => Cow::Owned(
            LEADING_NUMBER_QUOTE
                .replace_all(&t, r#""${1}":${2}${3}"#)
                .into_owned(),
        ),
    }
}

static BARE_TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""(month|clock)"\s*:\s*([A-Za-z][A-Za-z ]*|\d{1,2}:\d{2}(?:\s*[AaPp][Mm])?)\s*([,}])"#,
    )
    .expect("bare time pattern")
});

fn quote_time_tokens(text: &str) -> Cow<'_, str> {
    BARE_TIME_TOKEN.replace_all(text, |caps: &Captures<'_>| {
        let token = caps[2].trim();
        if matches!(token, "null" | "true" | "false") {
            return caps[0].to_string();
        }
        format!(r#""{}":"{}"{}"#, &caps[1], token, &caps[3])
    })
}

static BOND_FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""bond"\s*:\s*"?\s*(-?\d+(?:\.\d+)?)\s*/\s*100\s*"?"#).expect("bond pattern")
});

fn bond_fraction(text: &str) -> Cow<'_, str> {
    BOND_FRACTION.replace_all(text, r#""bond":${1}"#)
}

// `"Fire, "Ice"`: the first element lost its closing quote.
static MISSING_CLOSE_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([^"\s\[\]{}\\])\s*,\s*""#).expect("list quote pattern"));
// `"Fire" "Ice"`: the separating comma is missing.
static MISSING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([^\s,\[\\])"\s+""#).expect("list comma pattern"));

fn fix_list_fields(text: &str) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(text);
    for field in LIST_FIELDS {
        let next = match patch_array_field(&out, field, fix_list_body) {
            Cow::Owned(next) => next,
            Cow::Borrowed(_) => continue,
        };
        out = Cow::Owned(next);
    }
    out
}

fn fix_list_body(body: &str) -> String {
    patch_top_level(body, |segment| {
        let step = MISSING_CLOSE_QUOTE.replace_all(segment, r#"${1}",""#);
        MISSING_COMMA.replace_all(&step, r#"${1}",""#).into_owned()
    })
}

/// Finds every `"field": [ ... ]` in `text` and rewrites the inside of the
/// array with `patch`. The closing bracket is found with a depth counter, so
/// nested arrays are handled; an array that never closes is left alone.
pub fn patch_array_field<'a>(
    text: &'a str,
    field: &str,
    patch: impl Fn(&str) -> String,
) -> Cow<'a, str> {
    let key = format!("\"{field}\"");
    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0usize;
    for at in memmem::find_iter(bytes, key.as_bytes()) {
        if at < copied {
            continue;
        }
        let Some(open) = array_start_after_key(bytes, at + key.len()) else {
            continue;
        };
        let Some(close) = matching_bracket(bytes, open) else {
            continue;
        };
        out.push_str(&text[copied..=open]);
        out.push_str(&patch(&text[open + 1..close]));
        copied = close;
    }
    if copied == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

fn array_start_after_key(bytes: &[u8], mut i: usize) -> Option<usize> {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    (bytes.get(i) == Some(&b'[')).then_some(i)
}

fn matching_bracket(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while let Some(off) = memchr::memchr2(b'[', b']', &bytes[i..]) {
        let p = i + off;
        if bytes[p] == b'[' {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                return Some(p);
            }
        }
        i = p + 1;
    }
    None
}

/// Applies `f` only to the parts of an array body that are not inside a
/// nested object or array.
fn patch_top_level(body: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(body.len() + 8);
    let mut depth = 0usize;
    let mut seg_start = 0usize;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'{' | b'[' => {
                if depth == 0 {
                    out.push_str(&f(&body[seg_start..i]));
                    seg_start = i;
                }
                depth += 1;
            }
            b'}' | b']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    out.push_str(&body[seg_start..=i]);
                    seg_start = i + 1;
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        out.push_str(&f(&body[seg_start..]));
    } else {
        out.push_str(&body[seg_start..]);
    }
    out
}
