//! Chat session controller
//!
//! Owns the ordered message list and the `Idle -> Sending -> Idle` send state.
//! At most one chat request is in flight per session; a send attempted while
//! another is pending is rejected, not queued.

use parking_lot::Mutex;

use crate::api::ChatBackend;
use crate::source::Source;
use crate::state::{ChatMessage, SendState, APOLOGY_TEXT, CONNECTION_ERROR_TEXT};
use crate::status::{ModelInfo, ServerStatus, StatusIndicator};
use crate::view::ChatView;

/// Result of a single `send_message` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered and the answer was appended.
    Delivered,
    /// The backend answered with an `error` field; an apology was appended.
    BackendError,
    /// The request failed or the reply was not JSON; a connection error was appended.
    ConnectionError,
    /// The backend answered with neither a response nor an error.
    NoReply,
    /// Nothing happened.
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Busy,
}

pub struct ChatSession<B, V> {
    backend: B,
    view: V,
    messages: Mutex<Vec<ChatMessage>>,
    state: Mutex<SendState>,
}

/// Held for the whole time a send is in `Sending`. Dropping it is the only
/// way back to `Idle`, so cleanup runs once on every exit path, including a
/// send future that is dropped mid-request.
struct SendingGuard<'a, B: ChatBackend, V: ChatView> {
    session: &'a ChatSession<B, V>,
}

impl<B: ChatBackend, V: ChatView> Drop for SendingGuard<'_, B, V> {
    fn drop(&mut self) {
        *self.session.state.lock() = SendState::Idle;
        self.session.view.hide_typing();
    }
}

impl<B: ChatBackend, V: ChatView> ChatSession<B, V> {
    pub fn new(backend: B, view: V) -> Self {
        Self {
            backend,
            view,
            messages: Mutex::new(Vec::new()),
            state: Mutex::new(SendState::Idle),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the conversation in display order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().clone()
    }

    pub fn state(&self) -> SendState {
        *self.state.lock()
    }

    pub fn is_sending(&self) -> bool {
        self.state() == SendState::Sending
    }

    /// Replay history, then show server status, then hand focus to the input.
    /// Neither fetch failing is fatal.
    pub async fn initialize(&self) {
        self.load_history().await;
        self.check_status().await;
        self.view.focus_input();
    }

    pub async fn check_status(&self) -> Option<ServerStatus> {
        match self.backend.status().await {
            Ok(status) => {
                log::info!(
                    "Server status: model_loaded={} model_type={:?}",
                    status.model_loaded,
                    status.model_type
                );
                self.view
                    .set_status(&StatusIndicator::from_model_loaded(status.model_loaded));
                self.view
                    .set_model_info(&ModelInfo::from_model_type(&status.model_type));
                Some(status)
            }
            Err(e) => {
                log::warn!("Status check failed: {}", e);
                self.view.set_status(&StatusIndicator::offline());
                None
            }
        }
    }

    /// Returns the number of messages appended.
    pub async fn load_history(&self) -> usize {
        let entries = match self.backend.history().await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not load chat history: {}", e);
                return 0;
            }
        };

        let count = entries.len() * 2;
        for entry in entries {
            self.append(ChatMessage::user(entry.question));
            self.append(ChatMessage::assistant(entry.answer, entry.source));
        }
        log::debug!("Replayed {} history messages", count);
        count
    }

    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Rejected(Rejection::Empty);
        }

        let Some(_sending) = self.try_begin_send() else {
            log::debug!("Ignoring message while a response is pending");
            return SendOutcome::Rejected(Rejection::Busy);
        };

        self.append(ChatMessage::user(text));
        self.view.clear_input();
        self.view.show_typing();

        match self.backend.chat(text).await {
            Ok(reply) => match reply.response.filter(|r| !r.is_empty()) {
                Some(response) => {
                    let source = reply.source;
                    self.append(ChatMessage::assistant(response, source.clone()));
                    if let Some(source) = &source {
                        self.view.set_source_badge(source.display_name());
                    }
                    SendOutcome::Delivered
                }
                None => match reply.error {
                    Some(error) => {
                        log::warn!("Backend reported an error: {}", error);
                        self.append(ChatMessage::assistant(APOLOGY_TEXT, Some(Source::Error)));
                        SendOutcome::BackendError
                    }
                    None => {
                        log::warn!("Chat reply had neither a response nor an error");
                        SendOutcome::NoReply
                    }
                },
            },
            Err(e) => {
                log::warn!("Chat request failed: {}", e);
                self.append(ChatMessage::assistant(
                    CONNECTION_ERROR_TEXT,
                    Some(Source::Error),
                ));
                SendOutcome::ConnectionError
            }
        }
    }

    /// Put a canned question in the input field and send it.
    pub async fn ask_quick_question(&self, question: &str) -> SendOutcome {
        self.view.set_input(question);
        self.send_message(question).await
    }

    fn try_begin_send(&self) -> Option<SendingGuard<'_, B, V>> {
        let mut state = self.state.lock();
        if *state == SendState::Sending {
            return None;
        }
        *state = SendState::Sending;
        Some(SendingGuard { session: self })
    }

    fn append(&self, message: ChatMessage) {
        self.messages.lock().push(message.clone());
        self.view.render_message(&message);
    }
}
