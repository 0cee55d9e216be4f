use crate::host::Message;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

pub const OPEN_TAG: &str = "<rpg_state>";
pub const CLOSE_TAG: &str = "</rpg_state>";

/// A complete `<rpg_state ...>...</rpg_state>` span; attributes on the opening
/// tag are ignored and tag names match in any case.
static TAG_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<rpg_state\b[^>]*>(.*?)</rpg_state>").expect("tag pattern")
});

/// Result of a backward scan over the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    /// Position of the message in the transcript.
    pub index: usize,
    /// Text between the tags, untouched.
    pub inner: &'a str,
}

/// Inner text of the first tagged block in `text`.
pub fn block_inner(text: &str) -> Option<&str> {
    TAG_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Byte range of the first tagged block in `text`, tags included.
pub fn block_span(text: &str) -> Option<Range<usize>> {
    TAG_BLOCK.find(text).map(|m| m.range())
}

/// Scans from the newest message backward and returns the first block found
/// in a message not written by the user.
pub fn find_latest_block(messages: &[Message]) -> Option<Located<'_>> {
    messages.iter().enumerate().rev().find_map(|(index, msg)| {
        if msg.is_user() {
            return None;
        }
        let inner = block_inner(msg.text()?)?;
        Some(Located { index, inner })
    })
}

pub fn find_latest_index(messages: &[Message]) -> Option<usize> {
    find_latest_block(messages).map(|l| l.index)
}

/// Replaces the first tagged block in `text` with `block`, keeping every
/// other byte as it was. `None` when `text` has no block.
pub fn replace_block(text: &str, block: &str) -> Option<String> {
    let span = block_span(text)?;
    let mut out = String::with_capacity(text.len() - span.len() + block.len());
    out.push_str(&text[..span.start]);
    out.push_str(block);
    out.push_str(&text[span.end..]);
    Some(out)
}

/// Wraps serialized state in tags.
pub fn wrap_block(json: &str) -> String {
    let mut s = String::with_capacity(json.len() + OPEN_TAG.len() + CLOSE_TAG.len());
    s.push_str(OPEN_TAG);
    s.push_str(json);
    s.push_str(CLOSE_TAG);
    s
}
