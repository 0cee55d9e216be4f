//! The controller that owns the live state tree.
//!
//! Everything the front end does goes through [`Session`]: scanning the chat,
//! selecting and editing entities, and writing the result back. The host's
//! transcript is borrowed per call and never held.

use crate::debounce::Debouncer;
use crate::diagnose::{Diagnostic, ParseStage, diagnose_serde};
use crate::editor::{Edit, apply_edit};
use crate::error::{ScanError, SessionError};
use crate::export::{export_block, export_json_pretty, write_back};
use crate::host::{ChatHost, Message};
use crate::hud::{RosterEntry, roster};
use crate::locate::{block_inner, find_latest_block, replace_block, wrap_block};
use crate::model::{Entity, EntityKind, RpgState, Vitals};
use crate::normalize::normalize_state;
use crate::options::Options;
use crate::repair::{RepairLogEntry, repair_with_log};
use crate::sanitize::sanitize;
use serde_json::Value;
use std::time::Instant;

/// What started a scan. Manual scans report missing tags and always write
/// the normalized state back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Manual,
    Auto,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Message the block was read from.
    pub index: usize,
    /// Whether the repair pass was needed.
    pub repaired: bool,
    /// Message written back to, if a write-back happened.
    pub wrote_back: Option<usize>,
    /// Rules that fired, when repair logging is on.
    pub repair_log: Vec<RepairLogEntry>,
}

/// Health of the newest message's block, for the status light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    NoChat,
    LastIsUser,
    NoTag,
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn label(&self) -> &'static str {
        match self {
            Validity::NoChat => "No chat",
            Validity::LastIsUser => "Last is user",
            Validity::NoTag => "No <rpg_state>",
            Validity::Valid => "Latest OK",
            Validity::Invalid(_) => "Latest BAD JSON",
        }
    }
}

/// Checks only the newest message, parsing its sanitized block without repair.
pub fn latest_validity(messages: &[Message]) -> Validity {
    let Some(last) = messages.last() else {
        return Validity::NoChat;
    };
    if last.is_user() {
        return Validity::LastIsUser;
    }
    let Some(inner) = block_inner(last.text().unwrap_or_default()) else {
        return Validity::NoTag;
    };
    match serde_json::from_str::<Value>(&sanitize(inner)) {
        Ok(_) => Validity::Valid,
        Err(e) => Validity::Invalid(e.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub validity: Validity,
    /// Set only when the status just changed into `Invalid`.
    pub entered_broken: bool,
}

/// Result of one debounced automatic pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Status light after the pass; `entered_broken` is the one-time alert.
    pub status: StatusUpdate,
    pub scan: Result<ScanReport, ScanError>,
}

/// The selected entity as the HUD shows it.
#[derive(Debug, Clone, Copy)]
pub struct Active<'a> {
    pub root: &'a Entity,
    /// The active vehicle's vitals when one is driven, else the entity's.
    pub display: &'a Vitals,
    pub kind: EntityKind,
    /// Position inside the entity's own roster.
    pub position: usize,
    pub is_vehicle: bool,
}

/// Which path `sync_latest` delivered the state through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The newest agent message's block was replaced.
    Replaced(usize),
    /// A block was appended to the newest agent message.
    Appended(usize),
    /// An older tagged message was updated.
    WroteBack(usize),
    /// The block was put into the user's draft.
    Drafted,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: RpgState,
    selected: usize,
    last_tag_index: Option<usize>,
    status: Option<Validity>,
    last_error: Option<Diagnostic>,
    opts: Options,
    debouncer: Debouncer,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Options::default())
    }
}

impl Session {
    pub fn new(opts: Options) -> Self {
        Session {
            state: normalize_state(&Value::Null, &opts),
            selected: 0,
            last_tag_index: None,
            status: None,
            last_error: None,
            debouncer: Debouncer::new(opts.scan_delay),
            opts,
        }
    }

    pub fn state(&self) -> &RpgState {
        &self.state
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Message the current state was read from or last written to.
    pub fn last_tag_index(&self) -> Option<usize> {
        self.last_tag_index
    }

    /// Most recent parse problem, kept for the debug view.
    pub fn last_error(&self) -> Option<&Diagnostic> {
        self.last_error.as_ref()
    }

    /// Finds the newest block, parses it (repairing if needed) and replaces
    /// the state wholesale. On failure the state is left untouched.
    pub fn scan<H: ChatHost + ?Sized>(
        &mut self,
        host: &mut H,
        trigger: Trigger,
    ) -> Result<ScanReport, ScanError> {
        let Some(found) = find_latest_block(host.messages()) else {
            if trigger == Trigger::Manual {
                tracing::warn!("no <rpg_state> block found in agent messages");
            }
            return Err(ScanError::NoTag);
        };
        let index = found.index;
        let inner = found.inner.to_string();
        self.last_tag_index = Some(index);
        tracing::debug!(index, ?trigger, "scanning state block");

        let clean = sanitize(&inner);
        let (parsed, repaired, repair_log) = match serde_json::from_str::<Value>(&clean) {
            Ok(v) => {
                self.last_error = None;
                (v, false, Vec::new())
            }
            Err(raw) => {
                self.last_error = Some(Diagnostic::bare(ParseStage::Raw, raw.to_string()));
                tracing::debug!(error = %raw, "raw parse failed, repairing");
                let (fixed, log) = repair_with_log(&inner, &self.opts);
                match serde_json::from_str::<Value>(&fixed) {
                    Ok(v) => (v, true, log),
                    Err(e) => {
                        let d = diagnose_serde(ParseStage::Repaired, &e, &fixed, &self.opts);
                        if trigger == Trigger::Manual {
                            tracing::warn!(error = %e, "state block still invalid after repair");
                        }
                        self.last_error = Some(d.clone());
                        return Err(ScanError::Parse(Box::new(d)));
                    }
                }
            }
        };

        self.state = normalize_state(&parsed, &self.opts);
        if self.selected >= self.state.entity_count() {
            self.selected = 0;
        }

        let rewrite = trigger == Trigger::Manual || (repaired && self.opts.rewrite_on_auto_repair);
        let wrote_back = if rewrite { self.write_back(host) } else { None };
        Ok(ScanReport {
            index,
            repaired,
            wrote_back,
            repair_log,
        })
    }

    /// Recomputes the status light. `entered_broken` fires once per
    /// transition into a broken block.
    pub fn refresh_status(&mut self, messages: &[Message]) -> StatusUpdate {
        let validity = latest_validity(messages);
        let was_invalid = matches!(self.status, Some(Validity::Invalid(_)));
        let entered_broken = matches!(validity, Validity::Invalid(_)) && !was_invalid;
        self.status = Some(validity.clone());
        StatusUpdate {
            validity,
            entered_broken,
        }
    }

    pub fn status(&self) -> Option<&Validity> {
        self.status.as_ref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.state.entity_count() {
            return Err(SessionError::InvalidSelection(index));
        }
        self.selected = index;
        Ok(())
    }

    /// Roster and position of the selection. Falls back to the player when
    /// the selection is out of range.
    pub fn pointer(&self) -> (EntityKind, usize) {
        self.state
            .locate(self.selected)
            .unwrap_or((EntityKind::Player, 0))
    }

    pub fn active(&self) -> Active<'_> {
        let (kind, position) = self.pointer();
        let root = self
            .state
            .group(kind)
            .get(position)
            .unwrap_or(&self.state.player);
        let vehicle = root.active_vehicle();
        Active {
            root,
            display: vehicle.map(|v| &v.vitals).unwrap_or(&root.vitals),
            kind,
            position,
            is_vehicle: vehicle.is_some(),
        }
    }

    pub fn roster(&self, viewer: Option<&str>) -> Vec<RosterEntry> {
        roster(&self.state, viewer)
    }

    /// Deletes the selected party member, enemy or NPC and returns it.
    pub fn remove_active<H: ChatHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<Entity, SessionError> {
        let (kind, position) = self.pointer();
        let group = self
            .state
            .group_mut(kind)
            .ok_or(SessionError::PlayerNotRemovable)?;
        if position >= group.len() {
            return Err(SessionError::InvalidSelection(self.selected));
        }
        let removed = group.remove(position);
        self.selected = 0;
        self.write_back(host);
        Ok(removed)
    }

    /// Empties one roster. The selection returns to the player if it was in it.
    pub fn clear_group<H: ChatHost + ?Sized>(
        &mut self,
        kind: EntityKind,
        host: &mut H,
    ) -> Result<usize, SessionError> {
        let (selected_kind, _) = self.pointer();
        let group = self
            .state
            .group_mut(kind)
            .ok_or(SessionError::PlayerNotRemovable)?;
        let removed = group.len();
        group.clear();
        if selected_kind == kind || self.selected >= self.state.entity_count() {
            self.selected = 0;
        }
        self.write_back(host);
        Ok(removed)
    }

    /// Back to the default template. The chat is not touched.
    pub fn reset(&mut self) {
        self.state = normalize_state(&Value::Null, &self.opts);
        self.selected = 0;
        self.last_error = None;
    }

    /// Applies an editor submission to the selection and writes back.
    pub fn apply_edit<H: ChatHost + ?Sized>(
        &mut self,
        host: &mut H,
        edit: &Edit,
    ) -> Result<Option<usize>, SessionError> {
        apply_edit(&mut self.state, self.selected, edit, &self.opts)?;
        Ok(self.write_back(host))
    }

    /// Puts the current state into the chat by the best available path: the
    /// newest agent message (when `overwrite_last` allows), an older tagged
    /// message, or the user's draft.
    pub fn sync_latest<H: ChatHost + ?Sized>(
        &mut self,
        host: &mut H,
        overwrite_last: bool,
    ) -> SyncOutcome {
        let block = match export_block(&self.state) {
            Ok(b) => b,
            Err(err) => {
                tracing::warn!(%err, "could not export state");
                return SyncOutcome::Failed;
            }
        };

        let last = host.messages().len().checked_sub(1);
        if let Some(i) = last.filter(|&i| overwrite_last && !host.messages()[i].is_user()) {
            let text = host.messages()[i].text().unwrap_or_default();
            let (updated, outcome) = match replace_block(text, &block) {
                Some(t) => (t, SyncOutcome::Replaced(i)),
                None => (
                    format!("{text}\n\n{block}").trim().to_string(),
                    SyncOutcome::Appended(i),
                ),
            };
            host.messages_mut()[i].mes = Some(updated);
            if let Err(err) = host.persist() {
                tracing::warn!(%err, "persist after sync failed");
            }
            self.last_tag_index = Some(i);
            return outcome;
        }

        if let Some(i) = self.write_back(host) {
            return SyncOutcome::WroteBack(i);
        }

        let pretty = match export_json_pretty(&self.state) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(%err, "could not export state");
                return SyncOutcome::Failed;
            }
        };
        if host.append_to_draft(&wrap_block(&pretty)) {
            SyncOutcome::Drafted
        } else {
            tracing::warn!("host has no draft input; state not delivered");
            SyncOutcome::Failed
        }
    }

    /// Marks a chat mutation; the scan runs from `tick` once things go quiet.
    pub fn on_mutation(&mut self, now: Instant) {
        self.debouncer.notify(now);
    }

    /// Runs the pending automatic scan when its quiet period has passed.
    pub fn tick<H: ChatHost + ?Sized>(&mut self, now: Instant, host: &mut H) -> Option<TickReport> {
        if !self.debouncer.ready(now) {
            return None;
        }
        let status = self.refresh_status(host.messages());
        if status.entered_broken {
            tracing::warn!(status = status.validity.label(), "latest state block is broken");
        }
        let scan = self.scan(host, Trigger::Auto);
        Some(TickReport { status, scan })
    }

    fn write_back<H: ChatHost + ?Sized>(&mut self, host: &mut H) -> Option<usize> {
        match write_back(host, self.last_tag_index, &self.state) {
            Ok(i) => {
                self.last_tag_index = Some(i);
                Some(i)
            }
            Err(err) => {
                tracing::warn!(%err, "write-back skipped");
                None
            }
        }
    }
}
