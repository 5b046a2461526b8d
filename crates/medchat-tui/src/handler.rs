use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::App;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::View(update) => app.apply(update),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,

        // Enter sends, Shift+Enter starts a new line
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => insert_char(app, '\n'),
        KeyCode::Enter => app.submit(),

        // Quick questions
        KeyCode::F(n) if (1..=9).contains(&n) => app.ask_quick_question(usize::from(n - 1)),

        // Scrolling the conversation
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(app.page_size()),
        KeyCode::PageDown => app.scroll_down(app.page_size()),

        // Line editing
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.input_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.input.chars().count();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => insert_char(app, c),
        _ => {}
    }
}

fn insert_char(app: &mut App, c: char) {
    let byte_pos = char_to_byte_index(&app.input, app.input_cursor);
    app.input.insert(byte_pos, c);
    app.input_cursor += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use medchat_core::{ChatMessage, ViewEvent};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        assert_eq!(char_to_byte_index("añb", 2), 3);
        assert_eq!(char_to_byte_index("añb", 10), 4);
    }

    #[test]
    fn test_editing_keys() {
        let mut app = test_app();
        type_text(&mut app, "chest pián");
        handle_event(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_event(&mut app, key(KeyCode::Home)).unwrap();
        handle_event(&mut app, key(KeyCode::Delete)).unwrap();
        assert_eq!(app.input, "hest piá");
        assert_eq!(app.input_cursor, 0);

        handle_event(&mut app, key(KeyCode::End)).unwrap();
        assert_eq!(app.input_cursor, 8);
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut app = test_app();
        type_text(&mut app, "a");
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT)),
        )
        .unwrap();
        type_text(&mut app, "b");
        assert_eq!(app.input, "a\nb");
    }

    #[test]
    fn test_ctrl_c_and_esc_quit() {
        let mut app = test_app();
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        assert!(app.should_quit);
        assert!(app.input.is_empty());

        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_unconfigured_quick_question_is_ignored() {
        let mut app = test_app();
        app.quick_questions.clear();
        handle_event(&mut app, key(KeyCode::F(3))).unwrap();
        assert!(app.entries.is_empty());
    }

    #[test]
    fn test_view_events_are_applied() {
        let mut app = test_app();
        handle_event(&mut app, AppEvent::View(ViewEvent::Message(ChatMessage::user("hi"))))
            .unwrap();
        handle_event(&mut app, AppEvent::View(ViewEvent::ShowTyping)).unwrap();
        handle_event(&mut app, AppEvent::Tick).unwrap();
        assert_eq!(app.animation_frame, 1);
        assert_eq!(app.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_typing_after_enter_survives_clear_input() {
        let mut app = test_app();
        type_text(&mut app, "hello");
        handle_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.input.is_empty());
        assert_eq!(app.input_cursor, 0);

        type_text(&mut app, "x");
        handle_event(&mut app, AppEvent::View(ViewEvent::ClearInput)).unwrap();
        assert_eq!(app.input, "x");
        assert_eq!(app.input_cursor, 1);

        // A clear that was not triggered by Enter still empties the box.
        handle_event(&mut app, AppEvent::View(ViewEvent::ClearInput)).unwrap();
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_enter_with_blank_input_sends_nothing() {
        let mut app = test_app();
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter)).unwrap();
        tokio::task::yield_now().await;

        assert!(app.session.messages().is_empty());
        assert!(!app.session.is_sending());
        assert_eq!(app.input, "   ");
    }
}
