use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Focus};
use crate::chat::ChatView;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string edits.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.view.tick_animation(),
        AppEvent::Reply(outcome) => app.finish_send(outcome),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.view.focus {
        Focus::Input => handle_input_key(app, key),
        Focus::Log => handle_log_key(app, key),
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Shift+Enter inserts a newline and never submits; bare Enter is
        // the send affordance.
        KeyCode::Enter => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                insert_char(app, '\n');
            } else {
                app.submit_input();
            }
        }

        KeyCode::Esc | KeyCode::Tab => {
            app.view.focus = Focus::Log;
        }

        KeyCode::Backspace => {
            if app.view.cursor > 0 {
                app.view.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.view.input, app.view.cursor);
                app.view.input.remove(byte_pos);
                app.view.autosize_input();
            }
        }
        KeyCode::Delete => {
            let char_count = app.view.input.chars().count();
            if app.view.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.view.input, app.view.cursor);
                app.view.input.remove(byte_pos);
                app.view.autosize_input();
            }
        }
        KeyCode::Left => {
            app.view.cursor = app.view.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.view.input.chars().count();
            app.view.cursor = (app.view.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.view.cursor = 0;
        }
        KeyCode::End => {
            app.view.cursor = app.view.input.chars().count();
        }

        KeyCode::Up => {
            app.view.scroll = app.view.scroll.saturating_sub(1);
        }
        KeyCode::Down => {
            app.view.scroll = app.view.scroll.saturating_add(1);
        }
        KeyCode::PageUp => scroll_half_page_up(app),
        KeyCode::PageDown => scroll_half_page_down(app),

        KeyCode::Char(c) => insert_char(app, c),

        _ => {}
    }
}

fn handle_log_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
        }

        KeyCode::Tab | KeyCode::Char('i') => {
            app.view.focus = Focus::Input;
        }

        KeyCode::Char('j') | KeyCode::Down => {
            app.view.scroll = app.view.scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.view.scroll = app.view.scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => {
            app.view.scroll = 0;
        }
        KeyCode::Char('G') => {
            app.view.scroll_to_bottom();
        }
        KeyCode::PageUp => scroll_half_page_up(app),
        KeyCode::PageDown => scroll_half_page_down(app),

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.view.scroll = app.view.scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => {
            app.view.scroll = app.view.scroll.saturating_sub(3);
        }
        _ => {}
    }
}

fn insert_char(app: &mut App, c: char) {
    let byte_pos = char_to_byte_index(&app.view.input, app.view.cursor);
    app.view.input.insert(byte_pos, c);
    app.view.cursor += 1;
    app.view.autosize_input();
}

fn scroll_half_page_up(app: &mut App) {
    let half = (app.view.chat_height / 2).max(1);
    app.view.scroll = app.view.scroll.saturating_sub(half);
}

fn scroll_half_page_down(app: &mut App) {
    let half = (app.view.chat_height / 2).max(1);
    app.view.scroll = app.view.scroll.saturating_add(half);
}
