//! Text formatting for display
//!
//! Formatting is applied exactly once, when a message is rendered. It is not
//! idempotent: running `format_message` over its own output inserts the list
//! breaks a second time.

use regex::Regex;
use std::sync::LazyLock;

use crate::state::{ChatMessage, ChatRole};

/// Line-break marker emitted by [`format_message`].
pub const LINE_BREAK: &str = "<br>";

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.\s").expect("numbered item pattern is valid"));

/// Convert newlines to line-break markup and start numbered list items
/// ("1. ", "23. ") on their own line.
pub fn format_message(text: &str) -> String {
    let text = text.replace('\n', LINE_BREAK);
    NUMBERED_ITEM
        .replace_all(&text, |caps: &regex::Captures| format!("{}{}", LINE_BREAK, &caps[0]))
        .into_owned()
}

/// Map a source code to its label. Unrecognized codes pass through unchanged.
pub fn format_source(code: &str) -> &str {
    match code {
        "model" => "AI Model",
        "knowledge_base" => "Knowledge Base",
        "error" => "System",
        other => other,
    }
}

/// Meta line shown under a message: sender, time and, when known, the source.
pub fn format_meta(message: &ChatMessage) -> String {
    let sender = match message.sender {
        ChatRole::User => "You",
        ChatRole::Assistant => "AI Assistant",
    };
    match &message.source {
        Some(source) => format!(
            "{} • {} • via {}",
            sender,
            message.timestamp,
            source.display_name()
        ),
        None => format!("{} • {}", sender, message.timestamp),
    }
}

/// Split formatted text back into display lines.
pub fn split_markup(formatted: &str) -> Vec<&str> {
    formatted.split(LINE_BREAK).collect()
}
