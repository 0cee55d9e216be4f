//! Boundary with the chat application that owns the transcript.

use crate::error::HostError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One chat message. Field names follow the common chat-log format
/// (`is_user`, `mes`); any other fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "authoredByUser")]
    pub is_user: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "text")]
    pub mes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn agent(text: &str) -> Self {
        Message {
            is_user: Some(false),
            mes: Some(text.to_string()),
            extra: Map::new(),
        }
    }

    pub fn user(text: &str) -> Self {
        Message {
            is_user: Some(true),
            mes: Some(text.to_string()),
            extra: Map::new(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.is_user.unwrap_or(false)
    }

    pub fn text(&self) -> Option<&str> {
        self.mes.as_deref()
    }
}

/// What this crate needs from the chat application.
pub trait ChatHost {
    fn messages(&self) -> &[Message];

    fn messages_mut(&mut self) -> &mut [Message];

    /// Ask the host to save the (mutated) transcript.
    fn persist(&mut self) -> Result<(), HostError>;

    /// Display name of the person at the keyboard, for `{{user}}` substitution.
    fn viewer_name(&self) -> Option<&str> {
        None
    }

    /// Appends text to the user's unsent input. Returns `false` when the host
    /// has no input box to write to.
    fn append_to_draft(&mut self, _text: &str) -> bool {
        false
    }
}

/// In-memory host used by the CLI and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub messages: Vec<Message>,
    pub viewer: Option<String>,
    pub draft: String,
    pub persist_count: usize,
    /// When set, `persist` fails with this message.
    pub fail_persist: Option<String>,
}

impl MemoryHost {
    pub fn new(messages: Vec<Message>) -> Self {
        MemoryHost {
            messages,
            ..MemoryHost::default()
        }
    }
}

impl ChatHost for MemoryHost {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut [Message] {
        &mut self.messages
    }

    fn persist(&mut self) -> Result<(), HostError> {
        if let Some(msg) = &self.fail_persist {
            return Err(HostError(msg.clone()));
        }
        self.persist_count += 1;
        Ok(())
    }

    fn viewer_name(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    fn append_to_draft(&mut self, text: &str) -> bool {
        if !self.draft.trim().is_empty() {
            self.draft = self.draft.trim().to_string();
            self.draft.push_str("\n\n");
        }
        self.draft.push_str(text);
        true
    }
}
