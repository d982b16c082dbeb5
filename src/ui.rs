use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::chat::Role;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(app.view.input_height),
    ])
    .areas(body_area);

    render_header(app, frame, header_area);
    render_chat_log(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let busy_indicator = if app.view.busy { " [sending] " } else { " " };

    let title = Line::from(vec![
        Span::styled(" charla ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            busy_indicator,
            Style::default().fg(Color::Yellow).italic(),
        ),
        Span::styled(&app.endpoint, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

fn render_chat_log(app: &mut App, frame: &mut Frame, area: Rect) {
    // Remember the inner dimensions for the view's scroll math.
    app.view.chat_height = area.height.saturating_sub(2);
    app.view.chat_width = area.width.saturating_sub(2);

    let border_color = if app.view.focus == Focus::Log {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Chat ");

    let text = if app.view.messages.is_empty() && !app.view.typing {
        Text::from(Span::styled(
            "Send a message to start the conversation...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for msg in &app.view.messages {
            match msg.role {
                Role::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                }
                Role::Ai => {
                    lines.push(Line::from(Span::styled(
                        "AI:",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
            }
            for line in msg.content.lines() {
                lines.push(Line::from(line));
            }
            lines.push(Line::default());
        }

        if app.view.typing {
            lines.push(Line::from(Span::styled(
                "AI:",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: ".", "..", "..."
            let dots = ".".repeat((app.view.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Typing{}", dots),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    let log = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.view.scroll, 0));

    frame.render_widget(log, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_focused = app.view.focus == Focus::Input;

    let border_color = if app.view.busy {
        Color::DarkGray
    } else if input_focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let title = if app.view.busy {
        " Message (waiting for reply) "
    } else {
        " Message "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let input = Paragraph::new(app.view.input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(block);

    frame.render_widget(input, area);

    if input_focused {
        set_input_cursor(app, frame, area);
    }
}

/// Place the terminal cursor at the edit position, clamped to the visible
/// box. The input text can span multiple lines (Shift+Enter).
fn set_input_cursor(app: &App, frame: &mut Frame, area: Rect) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    if inner_width == 0 || inner_height == 0 {
        return;
    }

    let mut row: u16 = 0;
    let mut col: u16 = 0;
    for c in app.view.input.chars().take(app.view.cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    let x = area.x + 1 + col.min(inner_width - 1);
    let y = area.y + 1 + row.min(inner_height - 1);
    frame.set_cursor(x, y);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.view.focus {
        Focus::Input => " Enter send · Shift+Enter newline · Tab log · Ctrl+C quit",
        Focus::Log => " j/k scroll · g/G top/bottom · Tab input · q quit",
    };

    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}
