use crate::diagnose::Diagnostic;
use thiserror::Error;

/// Why a scan produced no new state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no <rpg_state> block found in agent messages")]
    NoTag,
    #[error("state block is not valid JSON after repair: {}", .0.message)]
    Parse(Box<Diagnostic>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteBackError {
    #[error("chat is empty")]
    NoChat,
    #[error("no agent message carries an <rpg_state> block")]
    NoTaggedMessage,
    #[error("message {0} does not contain an <rpg_state> block")]
    TagMissing(usize),
    #[error("could not serialize state: {0}")]
    Serialize(String),
}

impl WriteBackError {
    pub fn from_serde(err: serde_json::Error) -> Self {
        WriteBackError::Serialize(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the player cannot be removed; reset the state instead")]
    PlayerNotRemovable,
    #[error("selection {0} is out of range")]
    InvalidSelection(usize),
}

/// Failure reported by the host when asked to persist the chat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host persist failed: {0}")]
pub struct HostError(pub String);
