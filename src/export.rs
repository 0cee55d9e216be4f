//! Serializes state for the chat and writes it back into the tagged message.

use crate::error::WriteBackError;
use crate::host::ChatHost;
use crate::locate::{block_span, find_latest_index, replace_block, wrap_block};
use crate::model::RpgState;
use crate::number::{BOND_SENTINEL, INFINITY_GLYPH, number_value, parse_bond};
use serde_json::Value;

/// State as a JSON tree ready for the chat: every `bond` at or above the
/// sentinel becomes the infinity glyph, everything else a plain number.
pub fn export_value(state: &RpgState) -> Result<Value, WriteBackError> {
    let mut v = serde_json::to_value(state).map_err(WriteBackError::from_serde)?;
    mark_unbounded_bonds(&mut v);
    Ok(v)
}

fn mark_unbounded_bonds(v: &mut Value) {
    match v {
        Value::Object(m) => {
            if let Some(b) = m.get_mut("bond") {
                let n = parse_bond(b);
                *b = if n >= BOND_SENTINEL {
                    Value::String(INFINITY_GLYPH.to_string())
                } else {
                    number_value(n)
                };
            }
            m.values_mut().for_each(mark_unbounded_bonds);
        }
        Value::Array(items) => items.iter_mut().for_each(mark_unbounded_bonds),
        _ => {}
    }
}

/// Compact JSON, as stored in chat messages.
pub fn export_json(state: &RpgState) -> Result<String, WriteBackError> {
    serde_json::to_string(&export_value(state)?).map_err(WriteBackError::from_serde)
}

/// Indented JSON, for text the user will read or edit before sending.
pub fn export_json_pretty(state: &RpgState) -> Result<String, WriteBackError> {
    serde_json::to_string_pretty(&export_value(state)?).map_err(WriteBackError::from_serde)
}

/// `<rpg_state>{compact json}</rpg_state>`
pub fn export_block(state: &RpgState) -> Result<String, WriteBackError> {
    Ok(wrap_block(&export_json(state)?))
}

/// Bracketed note carrying the current state, meant to be appended to the
/// prompt so the model continues from it.
pub fn prompt_note(state: &RpgState) -> Result<String, WriteBackError> {
    let json = export_json(state)?;
    Ok(format!(
        "\n\n[System Note: Current RPG state for reference: {}. Update values as needed based on the interaction and include the new <rpg_state> tag at the end of your response.]",
        wrap_block(&json)
    ))
}

/// Replaces the tagged block of the target message with the exported state.
///
/// The target is `recorded` when it still points inside the transcript,
/// otherwise the newest tagged agent message. Only the block's bytes change.
/// A failed persist is logged and not retried. Returns the index written.
pub fn write_back<H: ChatHost + ?Sized>(
    host: &mut H,
    recorded: Option<usize>,
    state: &RpgState,
) -> Result<usize, WriteBackError> {
    let messages = host.messages();
    if messages.is_empty() {
        return Err(WriteBackError::NoChat);
    }
    let index = match recorded.filter(|&i| i < messages.len()) {
        Some(i) => i,
        None => find_latest_index(messages).ok_or(WriteBackError::NoTaggedMessage)?,
    };
    let text = messages[index].text().unwrap_or_default();
    if block_span(text).is_none() {
        return Err(WriteBackError::TagMissing(index));
    }
    let block = export_block(state)?;
    let updated = replace_block(text, &block).ok_or(WriteBackError::TagMissing(index))?;
    host.messages_mut()[index].mes = Some(updated);
    tracing::debug!(index, bytes = block.len(), "state written back");
    if let Err(err) = host.persist() {
        tracing::warn!(%err, "persist after write-back failed");
    }
    Ok(index)
}
