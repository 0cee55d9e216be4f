//! Pinpoints where a state block failed to parse, for the debug view.
//!
//! The parser's own offset often lands after the real mistake (a missing
//! quote is only noticed a few tokens later). A short list of detectors looks
//! around that offset for the usual culprits and offers a second caret.

use crate::options::Options;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Which parse attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// Sanitized text, before any repair. Not terminal.
    Raw,
    /// Text after the repair pass. Terminal for the scan.
    Repaired,
}

impl ParseStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseStage::Raw => "parse",
            ParseStage::Repaired => "parse (after repair)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: ParseStage,
    pub message: String,
    /// Byte offset reported by the parser.
    pub offset: Option<usize>,
    /// Byte offset suggested by a detector, when it differs from `offset`.
    pub likely: Option<Candidate>,
    /// Text around `offset`, line breaks shown as spaces.
    pub snippet: String,
    /// Spaces followed by `^` under the parser's offset.
    pub caret: String,
    /// Second caret under `likely`, when it falls inside the same window.
    pub caret2: Option<String>,
}

impl Diagnostic {
    /// Message only, no context.
    pub fn bare(stage: ParseStage, message: impl Into<String>) -> Self {
        Diagnostic {
            stage,
            message: message.into(),
            offset: None,
            likely: None,
            snippet: String::new(),
            caret: String::new(),
            caret2: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.stage.as_str(), self.message)?;
        if let Some(c) = &self.likely {
            writeln!(f, "likely cause: {} at byte {}", c.detector, c.offset)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.snippet)?;
        if !self.caret.is_empty() {
            writeln!(f, "{}", self.caret)?;
        }
        if let Some(c2) = &self.caret2 {
            writeln!(f, "{}", c2)?;
        }
        Ok(())
    }
}

/// Bytes of text shown when no offset could be recovered.
const PREFIX_LEN: usize = 400;
/// Detectors look this far back from the reported offset...
const LOOK_BEHIND: usize = 260;
/// ...and this far ahead.
const LOOK_AHEAD: usize = 40;
/// A quote this close to the offset is preferred over a colon.
const NEAR_QUOTE: usize = 80;

static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)position\s+(\d+)").expect("position pattern"));
static LINE_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)line\s+(\d+)\s+column\s+(\d+)").expect("line/column pattern")
});

/// Offset named in a parser message, either as `position N` or as
/// `line L column C` (converted against `text`).
pub fn error_offset(message: &str, text: &str) -> Option<usize> {
    if let Some(c) = POSITION.captures(message) {
        let pos: usize = c[1].parse().ok()?;
        return Some(floor_boundary(text, pos));
    }
    let c = LINE_COLUMN.captures(message)?;
    let line: usize = c[1].parse::<usize>().ok()?.max(1);
    let col: usize = c[2].parse::<usize>().ok()?.max(1);
    Some(line_column_to_offset(text, line, col))
}

pub fn line_column_to_offset(text: &str, line: usize, col: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        memchr::memchr_iter(b'\n', text.as_bytes())
            .nth(line - 2)
            .map(|nl| nl + 1)
            .unwrap_or(0)
    };
    floor_boundary(text, line_start + (col - 1))
}

fn floor_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub offset: usize,
    pub detector: &'static str,
}

type Detector = fn(&str, usize, &str) -> Option<usize>;

/// Detectors in precedence order.
const DETECTORS: &[(&str, Detector)] = &[
    ("missing closing quote before colon", unterminated_key),
    ("missing opening quote on key", bare_key),
    ("quote or colon before property", near_property_name),
];

/// First detector that finds a more likely error site near `offset`.
pub fn likely_error_offset(text: &str, offset: usize, message: &str) -> Option<Candidate> {
    let offset = floor_boundary(text, offset);
    DETECTORS.iter().find_map(|(detector, f)| {
        f(text, offset, message).map(|offset| Candidate {
            offset,
            detector: *detector,
        })
    })
}

fn window(text: &str, p: usize) -> (usize, &str) {
    let start = floor_boundary(text, p.saturating_sub(LOOK_BEHIND));
    let end = ceil_boundary(text, p + LOOK_AHEAD);
    (start, &text[start..end])
}

static UNTERMINATED_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([A-Za-z_]\w*)\s*:\s*[^"\s][^,}\]]*"#).expect("unterminated key pattern")
});

// `"vehicle:null` - the colon sits inside what should have been the key.
fn unterminated_key(text: &str, p: usize, _msg: &str) -> Option<usize> {
    let (start, chunk) = window(text, p);
    let c = UNTERMINATED_KEY.captures_iter(chunk).last()?;
    let whole = c.get(0)?;
    Some(start + whole.start() + 1 + c[1].len())
}

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|[{\[,]\s*)([A-Za-z_]\w*)"\s*:"#).expect("bare key pattern")
});

// `vehicle": null` - points at the start of the key.
fn bare_key(text: &str, p: usize, _msg: &str) -> Option<usize> {
    let (start, chunk) = window(text, p);
    let c = BARE_KEY.captures_iter(chunk).last()?;
    Some(start + c.get(2)?.start())
}

fn near_property_name(text: &str, p: usize, msg: &str) -> Option<usize> {
    let m = msg.to_lowercase();
    let applies = m.contains("after property name")
        || m.contains("expected ':'")
        || m.contains("expected `:`")
        || m.contains("expected colon");
    if !applies {
        return None;
    }
    let start = floor_boundary(text, p.saturating_sub(LOOK_BEHIND));
    let left = &text[start..p];
    if let Some(q) = left.rfind('"') {
        if p - (start + q) < NEAR_QUOTE {
            return Some(start + q);
        }
    }
    left.rfind(':').map(|c| start + c)
}

/// A fixed-radius window of text and caret lines aligned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretWindow {
    pub start: usize,
    pub end: usize,
    pub slice: String,
}

impl CaretWindow {
    /// `radius` characters either side of `pos`.
    pub fn around(text: &str, pos: usize, radius: usize) -> Self {
        let pos = floor_boundary(text, pos);
        let start = text[..pos]
            .char_indices()
            .rev()
            .nth(radius.saturating_sub(1))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let start = if radius == 0 { pos } else { start };
        let end = text[pos..]
            .char_indices()
            .nth(radius)
            .map(|(i, _)| pos + i)
            .unwrap_or(text.len());
        let slice = text[start..end]
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        CaretWindow { start, end, slice }
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos <= self.end
    }

    /// Caret under the character at byte `pos` of the original text.
    pub fn caret(&self, text: &str, pos: usize) -> String {
        let pos = floor_boundary(text, pos.clamp(self.start, self.end));
        let indent = text[self.start..pos].chars().count();
        let mut s = " ".repeat(indent);
        s.push('^');
        s
    }
}

/// Builds the full diagnostic for a failed parse of `text`.
pub fn diagnose(stage: ParseStage, message: &str, text: &str, opts: &Options) -> Diagnostic {
    let Some(offset) = error_offset(message, text) else {
        let end = floor_boundary(text, PREFIX_LEN);
        return Diagnostic {
            snippet: text[..end].to_string(),
            ..Diagnostic::bare(stage, message)
        };
    };
    let win = CaretWindow::around(text, offset, opts.snippet_radius);
    let caret = win.caret(text, offset);
    let likely = likely_error_offset(text, offset, message).filter(|c| c.offset != offset);
    let caret2 = likely
        .filter(|c| win.contains(c.offset))
        .map(|c| win.caret(text, c.offset));
    Diagnostic {
        stage,
        message: message.to_string(),
        offset: Some(offset),
        likely,
        snippet: win.slice,
        caret,
        caret2,
    }
}

/// Diagnostic for a `serde_json` failure on `text`.
pub fn diagnose_serde(
    stage: ParseStage,
    err: &serde_json::Error,
    text: &str,
    opts: &Options,
) -> Diagnostic {
    diagnose(stage, &err.to_string(), text, opts)
}
