//! UI-agnostic session state types
//!
//! These are shared between the session controller and any front-end that
//! renders it, and don't depend on a specific UI framework.

use serde::{Deserialize, Serialize};

use crate::source::Source;

/// Reply to the user when the backend reports a logical error.
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Reply to the user when the chat request itself failed.
pub const CONNECTION_ERROR_TEXT: &str =
    "Connection error. Please check your internet connection and try again.";

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: ChatRole,
    pub timestamp: String,
    pub source: Option<Source>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: ChatRole::User,
            timestamp: now_timestamp(),
            source: None,
        }
    }

    pub fn assistant(text: impl Into<String>, source: Option<Source>) -> Self {
        Self {
            text: text.into(),
            sender: ChatRole::Assistant,
            timestamp: now_timestamp(),
            source,
        }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(rename = "ai")]
    Assistant,
}

/// Send state of a session. `Sending` is only entered from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
}

fn now_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_source() {
        let msg = ChatMessage::user("hello");
        assert_eq!(msg.sender, ChatRole::User);
        assert_eq!(msg.source, None);
        assert_eq!(msg.timestamp.len(), "12:34:56".len());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"ai\"");
    }
}
