//! Tracks a role-play game state carried as JSON inside `<rpg_state>` tags in
//! a chat transcript.
//!
//! The pipeline is: locate the newest tagged block written by the agent,
//! sanitize it, parse it (repairing the usual model mistakes when a plain
//! parse fails), normalize it into [`RpgState`], and write the normalized
//! state back into the same message. [`Session`] drives all of this against a
//! [`ChatHost`].

mod classify;
pub mod cli;
mod debounce;
pub mod diagnose;
pub mod editor;
pub mod error;
pub mod export;
pub mod host;
pub mod hud;
pub mod locate;
pub mod model;
pub mod normalize;
pub mod number;
pub mod options;
mod repair;
mod sanitize;
pub mod session;

pub use debounce::Debouncer;
pub use diagnose::{Diagnostic, ParseStage};
pub use editor::Edit;
pub use error::{HostError, ScanError, SessionError, WriteBackError};
pub use export::{
    export_block, export_json, export_json_pretty, export_value, prompt_note, write_back,
};
pub use host::{ChatHost, MemoryHost, Message};
pub use locate::find_latest_block;
pub use model::{Entity, EntityKind, RpgState, Vehicle, VehicleKind};
pub use normalize::normalize_state;
pub use options::{BondFloor, Options, UnboundedMeter};
pub use repair::{
    LIST_FIELDS, NUMERIC_FIELDS, REPAIR_RULES, RepairLogEntry, RepairRule, patch_array_field,
    repair, repair_with_log,
};
pub use sanitize::sanitize;
pub use session::{
    Session, StatusUpdate, SyncOutcome, TickReport, Trigger, Validity, latest_validity,
};

use serde_json::Value;

/// A successfully parsed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub state: RpgState,
    /// Whether the repair pass was needed.
    pub repaired: bool,
}

/// Parses the inner text of one `<rpg_state>` block into normalized state.
///
/// Sanitized text is parsed first; if that fails the repaired text is tried.
/// A failure of the second attempt is returned as a located [`Diagnostic`].
pub fn parse_block(raw: &str, opts: &Options) -> Result<Parsed, Diagnostic> {
    if let Ok(v) = serde_json::from_str::<Value>(&sanitize(raw)) {
        return Ok(Parsed {
            state: normalize_state(&v, opts),
            repaired: false,
        });
    }
    let fixed = repair(raw);
    match serde_json::from_str::<Value>(&fixed) {
        Ok(v) => Ok(Parsed {
            state: normalize_state(&v, opts),
            repaired: true,
        }),
        Err(e) => Err(diagnose::diagnose_serde(
            ParseStage::Repaired,
            &e,
            &fixed,
            opts,
        )),
    }
}

/// Finds the first block in `text` and parses it.
pub fn parse_message(text: &str, opts: &Options) -> Result<Parsed, ScanError> {
    let inner = locate::block_inner(text).ok_or(ScanError::NoTag)?;
    parse_block(inner, opts).map_err(|d| ScanError::Parse(Box::new(d)))
}

#[cfg(test)]
mod tests;
