use std::sync::Arc;

use medchat_core::{
    ChatMessage, ChannelView, ChatSession, Config, HttpBackend, ModelInfo, StatusIndicator,
    ViewEvent,
};

pub type Session = ChatSession<HttpBackend, ChannelView>;

/// One row group in the message list.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Message(ChatMessage),
    /// Transient "AI is typing" placeholder. At most one is ever present.
    Typing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub session: Arc<Session>,
    pub server_url: String,
    pub quick_questions: Vec<String>,

    // Message list
    pub entries: Vec<Entry>,
    pub show_welcome: bool,
    pub chat_scroll: usize,
    pub follow_bottom: bool,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Input state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars
    pub input_focused: bool,
    pub pending_clears: usize, // ClearInput events already applied by `submit`

    // Indicators, `None` until the first status check finishes
    pub status: Option<StatusIndicator>,
    pub model_info: Option<ModelInfo>,
    pub source_badge: Option<String>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(session: Arc<Session>, config: &Config) -> Self {
        Self {
            should_quit: false,
            session,
            server_url: config.server_url.clone(),
            quick_questions: config.quick_questions.clone(),

            entries: Vec::new(),
            show_welcome: true,
            chat_scroll: 0,
            follow_bottom: true,
            chat_height: 0,
            chat_width: 0,

            input: String::new(),
            input_cursor: 0,
            input_focused: false,
            pending_clears: 0,

            status: None,
            model_info: None,
            source_badge: None,

            animation_frame: 0,
        }
    }

    /// Apply one update from the session.
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Message(message) => {
                self.show_welcome = false;
                self.entries.push(Entry::Message(message));
                self.follow_bottom = true;
            }
            ViewEvent::ShowTyping => {
                if !self.is_typing() {
                    self.entries.push(Entry::Typing);
                }
                self.follow_bottom = true;
            }
            ViewEvent::HideTyping => {
                self.entries.retain(|entry| *entry != Entry::Typing);
            }
            ViewEvent::ClearInput => {
                if self.pending_clears > 0 {
                    // Already cleared on submit; keep what was typed since.
                    self.pending_clears -= 1;
                } else {
                    self.clear_input();
                }
            }
            ViewEvent::SetInput(text) => {
                self.input_cursor = text.chars().count();
                self.input = text;
            }
            ViewEvent::FocusInput => self.input_focused = true,
            ViewEvent::Status(indicator) => self.status = Some(indicator),
            ViewEvent::ModelInfo(info) => self.model_info = Some(info),
            ViewEvent::SourceBadge(label) => self.source_badge = Some(label),
        }
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    pub fn is_typing(&self) -> bool {
        self.entries.contains(&Entry::Typing)
    }

    pub fn message_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Message(_)))
            .count()
    }

    /// Hand the current input to the session. The send runs on its own task
    /// so the UI keeps drawing while the backend answers; the input box is
    /// cleared right away so keys pressed meanwhile are not lost.
    pub fn submit(&mut self) {
        if self.input.trim().is_empty() || self.session.is_sending() {
            return;
        }
        let text = std::mem::take(&mut self.input);
        self.input_cursor = 0;
        self.pending_clears += 1;

        let session = self.session.clone();
        tokio::spawn(async move {
            let outcome = session.send_message(&text).await;
            log::debug!("send finished: {:?}", outcome);
        });
    }

    pub fn ask_quick_question(&mut self, index: usize) {
        let Some(question) = self.quick_questions.get(index).cloned() else {
            return;
        };
        let session = self.session.clone();
        tokio::spawn(async move {
            let outcome = session.ask_quick_question(&question).await;
            log::debug!("quick question finished: {:?}", outcome);
        });
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_typing() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_up(&mut self, lines: usize) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_bottom = false;
    }

    /// Scrolling past the end is clamped when rendering, which also turns
    /// following back on.
    pub fn scroll_down(&mut self, lines: usize) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn page_size(&self) -> usize {
        usize::from(self.chat_height / 2).max(1)
    }

    /// Clamp the scroll offset against the rendered content height.
    pub fn update_scroll(&mut self, total_lines: usize) {
        let max_scroll = total_lines.saturating_sub(usize::from(self.chat_height));
        if self.follow_bottom || self.chat_scroll >= max_scroll {
            self.chat_scroll = max_scroll;
            self.follow_bottom = true;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use medchat_core::Source;

    pub(crate) fn test_app() -> App {
        let (view, _rx) = ChannelView::new();
        let session = Arc::new(ChatSession::new(HttpBackend::new("http://127.0.0.1:9"), view));
        App::new(session, &Config::new())
    }

    #[test]
    fn test_first_message_hides_welcome() {
        let mut app = test_app();
        assert!(app.show_welcome);

        app.apply(ViewEvent::Message(ChatMessage::user("hello")));
        assert!(!app.show_welcome);
        assert_eq!(app.message_count(), 1);
    }

    #[test]
    fn test_typing_placeholder_removed_by_identity() {
        let mut app = test_app();
        app.apply(ViewEvent::Message(ChatMessage::user("hello")));
        app.apply(ViewEvent::ShowTyping);
        app.apply(ViewEvent::ShowTyping);
        assert_eq!(app.entries.len(), 2);
        assert!(app.is_typing());

        app.apply(ViewEvent::Message(ChatMessage::assistant("hi", Some(Source::Model))));
        app.apply(ViewEvent::HideTyping);
        assert!(!app.is_typing());
        assert_eq!(app.message_count(), 2);

        // Hiding again is harmless.
        app.apply(ViewEvent::HideTyping);
        assert_eq!(app.entries.len(), 2);
    }

    #[test]
    fn test_set_and_clear_input() {
        let mut app = test_app();
        app.apply(ViewEvent::SetInput("What causes angina?".to_string()));
        assert_eq!(app.input_cursor, 19);

        app.apply(ViewEvent::ClearInput);
        assert!(app.input.is_empty());
        assert_eq!(app.input_cursor, 0);
    }

    #[test]
    fn test_indicators() {
        let mut app = test_app();
        app.apply(ViewEvent::Status(StatusIndicator::offline()));
        app.apply(ViewEvent::ModelInfo(ModelInfo::from_model_type("None")));
        app.apply(ViewEvent::SourceBadge("Knowledge Base".to_string()));

        assert_eq!(app.status, Some(StatusIndicator::offline()));
        assert_eq!(app.model_info.as_ref().map(|m| m.model_type.as_str()), Some("None"));
        assert_eq!(app.source_badge.as_deref(), Some("Knowledge Base"));
    }

    #[test]
    fn test_scroll_follows_bottom() {
        let mut app = test_app();
        app.chat_height = 10;
        app.update_scroll(30);
        assert_eq!(app.chat_scroll, 20);

        app.scroll_up(5);
        app.update_scroll(30);
        assert_eq!(app.chat_scroll, 15);
        assert!(!app.follow_bottom);

        app.scroll_down(100);
        app.update_scroll(30);
        assert_eq!(app.chat_scroll, 20);
        assert!(app.follow_bottom);

        // A new message snaps back to the bottom.
        app.scroll_up(5);
        app.apply(ViewEvent::Message(ChatMessage::user("more")));
        app.update_scroll(34);
        assert_eq!(app.chat_scroll, 24);
    }
}
