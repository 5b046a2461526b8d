use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use medchat_core::{format_message, format_meta, split_markup, ChatMessage, ChatRole};
use crate::app::{App, Entry};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            // Consume the second *
            chars.next();

            // Push any accumulated plain text
            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;

            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next(); // consume second *
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    // Push any remaining text
    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Rows a line takes once wrapped to `width` columns.
fn wrapped_rows(line: &Line, width: u16) -> usize {
    let width = usize::from(width.max(1));
    line.width().max(1).div_ceil(width)
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let (label, color) = match message.sender {
        ChatRole::User => ("You", Color::Cyan),
        ChatRole::Assistant => ("AI Assistant", Color::Yellow),
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{}:", label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];

    // Format exactly once, on display
    let formatted = format_message(&message.text);
    for line in split_markup(&formatted) {
        lines.push(parse_markdown_line(line));
    }

    lines.push(Line::from(Span::styled(
        format_meta(message),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::default());
    lines
}

fn welcome_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to the Medical AI Assistant",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Ask about symptoms, treatment, causes, or prevention of heart conditions."),
        Line::from(Span::styled(
            "This assistant does not replace a healthcare professional.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    if !app.quick_questions.is_empty() {
        lines.push(Line::from(Span::styled(
            "Quick questions:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (i, question) in app.quick_questions.iter().take(9).enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!(" F{} ", i + 1), Style::default().bg(Color::DarkGray).fg(Color::White)),
                Span::raw(format!(" {}", question)),
            ]));
        }
    }
    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let (dot_color, status_text, system_status) = match &app.status {
        Some(status) if status.online => (Color::Green, status.status_text, status.system_status),
        Some(status) => (Color::Red, status.status_text, status.system_status),
        None => (Color::Yellow, "Connecting", "Checking"),
    };

    let mut spans = vec![
        Span::styled(" Medical AI Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::raw(status_text),
        Span::styled(format!(" [{}]", system_status), Style::default().fg(dot_color)),
    ];

    if let Some(info) = &app.model_info {
        spans.push(Span::styled(
            format!("  Model: {}", info.model_type),
            Style::default().fg(Color::White),
        ));
    }

    spans.push(Span::styled(
        format!("  {} v{}", app.server_url, env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let response_source = app
        .model_info
        .as_ref()
        .map(|info| info.response_source)
        .unwrap_or("Unknown");

    let mut chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(
            " Conversation ({} messages) · Responses: {} ",
            app.message_count(),
            response_source
        ));
    if let Some(badge) = &app.source_badge {
        chat_block = chat_block.title_bottom(format!(" Last answer via {} ", badge));
    }

    let mut lines: Vec<Line> = Vec::new();
    if app.show_welcome {
        lines.extend(welcome_lines(app));
    }
    for entry in &app.entries {
        match entry {
            Entry::Message(message) => lines.extend(message_lines(message)),
            Entry::Typing => {
                // Animated ellipsis: cycles through ".", "..", "..."
                let dots = ".".repeat((app.animation_frame as usize) + 1);
                lines.push(Line::from(Span::styled(
                    "AI Assistant:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("Typing{}", dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    let total_lines = lines
        .iter()
        .map(|line| wrapped_rows(line, app.chat_width))
        .fold(0usize, usize::saturating_add);
    app.update_scroll(total_lines);

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(app.chat_scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let waiting = app.session.is_sending();
    let border_color = if waiting {
        Color::DarkGray
    } else if app.input_focused {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if waiting {
        " Waiting for response... "
    } else {
        " Message (Enter to send, Shift+Enter for new line) "
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    // Newlines are shown as a single glyph so the cursor column stays aligned
    let visible_text: String = app
        .input
        .chars()
        .map(|c| if c == '\n' { '↵' } else { c })
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, area);

    if app.input_focused {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
    ];
    if !app.quick_questions.is_empty() {
        let last = app.quick_questions.len().min(9);
        let keys = if last == 1 {
            " F1 ".to_string()
        } else {
            format!(" F1-F{} ", last)
        };
        hints.push(Span::styled(keys, key_style));
        hints.push(Span::styled(" quick questions ", label_style));
    }
    hints.push(Span::styled(" Esc ", key_style));
    hints.push(Span::styled(" quit ", label_style));

    let footer = Paragraph::new(Line::from(hints));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use medchat_core::{Source, StatusIndicator, ViewEvent};
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_parse_markdown_bold() {
        let line = parse_markdown_line("Call **911** now");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "911");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_parse_markdown_unclosed_is_literal() {
        assert_eq!(line_text(&parse_markdown_line("a **b")), "a **b");
    }

    #[test]
    fn test_message_lines_split_numbered_list() {
        let mut message = ChatMessage::assistant("Steps:\n1. call\n2. wait", Some(Source::Model));
        message.timestamp = "09:30:00".to_string();

        let texts: Vec<String> = message_lines(&message).iter().map(line_text).collect();
        assert_eq!(
            texts,
            vec![
                "AI Assistant:",
                "Steps:",
                "",
                "1. call",
                "",
                "2. wait",
                "AI Assistant • 09:30:00 • via AI Model",
                "",
            ]
        );
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows(&Line::from("abcdef"), 3), 2);
        assert_eq!(wrapped_rows(&Line::from("abcdefg"), 3), 3);
        assert_eq!(wrapped_rows(&Line::default(), 10), 1);
    }

    #[test]
    fn test_render_smoke() {
        let mut app = test_app();
        app.apply(ViewEvent::Status(StatusIndicator::online()));
        app.apply(ViewEvent::Message(ChatMessage::user("hello")));
        app.apply(ViewEvent::ShowTyping);

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("AI Model Ready"));
        assert!(screen.contains("hello"));
        assert!(screen.contains("Typing."));
        assert_eq!(app.chat_height, 13);
    }

    #[test]
    fn test_render_reply_longer_than_u16_rows() {
        let mut app = test_app();
        app.apply(ViewEvent::Message(ChatMessage::assistant(
            "x\n".repeat(70_000),
            Some(Source::Model),
        )));

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        // Sender line, 70,001 text lines, meta line and trailing blank.
        assert_eq!(app.chat_scroll, 70_004 - 13);
        assert!(app.follow_bottom);
    }
}
