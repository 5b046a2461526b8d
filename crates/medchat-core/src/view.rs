//! Presentation sink for a chat session
//!
//! The session only ever writes to the view. The one exception is the typing
//! placeholder, which the view removes by identity when asked to.

use tokio::sync::mpsc;

use crate::state::ChatMessage;
use crate::status::{ModelInfo, StatusIndicator};

pub trait ChatView: Send + Sync {
    /// Append a message to the bottom of the message list and scroll to it.
    fn render_message(&self, message: &ChatMessage);

    fn show_typing(&self);

    /// Remove the typing placeholder if it is present.
    fn hide_typing(&self);

    fn clear_input(&self);

    fn set_input(&self, text: &str);

    fn focus_input(&self);

    fn set_status(&self, indicator: &StatusIndicator);

    fn set_model_info(&self, info: &ModelInfo);

    fn set_source_badge(&self, label: &str);
}

/// One call on a [`ChatView`], as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Message(ChatMessage),
    ShowTyping,
    HideTyping,
    ClearInput,
    SetInput(String),
    FocusInput,
    Status(StatusIndicator),
    ModelInfo(ModelInfo),
    SourceBadge(String),
}

/// A view that forwards every call over a channel to whoever renders.
#[derive(Clone)]
pub struct ChannelView {
    tx: mpsc::UnboundedSender<ViewEvent>,
}

impl ChannelView {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ViewEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: ViewEvent) {
        // The receiver only goes away when the UI is shutting down.
        if self.tx.send(event).is_err() {
            log::debug!("view channel closed, dropping update");
        }
    }
}

impl ChatView for ChannelView {
    fn render_message(&self, message: &ChatMessage) {
        self.send(ViewEvent::Message(message.clone()));
    }

    fn show_typing(&self) {
        self.send(ViewEvent::ShowTyping);
    }

    fn hide_typing(&self) {
        self.send(ViewEvent::HideTyping);
    }

    fn clear_input(&self) {
        self.send(ViewEvent::ClearInput);
    }

    fn set_input(&self, text: &str) {
        self.send(ViewEvent::SetInput(text.to_string()));
    }

    fn focus_input(&self) {
        self.send(ViewEvent::FocusInput);
    }

    fn set_status(&self, indicator: &StatusIndicator) {
        self.send(ViewEvent::Status(indicator.clone()));
    }

    fn set_model_info(&self, info: &ModelInfo) {
        self.send(ViewEvent::ModelInfo(info.clone()));
    }

    fn set_source_badge(&self, label: &str) {
        self.send(ViewEvent::SourceBadge(label.to_string()));
    }
}
