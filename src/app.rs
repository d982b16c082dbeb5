use log::debug;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{ChatClient, SendError};
use crate::chat::{ChatController, ChatView, Message, Role};
use crate::config::Config;
use crate::tui::AppEvent;

/// The input box grows with its content up to this many text lines.
pub const MAX_INPUT_LINES: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Log,
    Input,
}

/// Renderable widget state. This is the `ChatView` the controller drives;
/// the `ui` module draws it and holds no state of its own.
pub struct WidgetView {
    pub messages: Vec<Message>,
    pub typing: bool,
    pub busy: bool,
    pub input: String,
    pub cursor: usize, // char index into `input`
    pub focus: Focus,
    pub scroll: u16,
    pub input_height: u16,

    // Log area dimensions, captured during render for wrap/scroll math.
    pub chat_width: u16,
    pub chat_height: u16,

    // 0-2, drives the typing ellipsis.
    pub animation_frame: u8,
}

impl WidgetView {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            typing: false,
            busy: false,
            input: String::new(),
            cursor: 0,
            focus: Focus::Input,
            scroll: 0,
            input_height: 3,
            chat_width: 0,
            chat_height: 0,
            animation_frame: 0,
        }
    }

    /// Advance the typing ellipsis (driven by the Tick event).
    pub fn tick_animation(&mut self) {
        if self.typing {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll so the newest row (or the typing placeholder) is visible.
    /// Mirrors the render-side wrapping: count wrapped lines per message at
    /// the last known log width.
    pub fn scroll_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            total_lines += 1; // role label ("You:" or "AI:")
            for line in msg.content.lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // blank separator
        }

        if self.typing {
            total_lines += 2; // label + indicator
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.scroll = total_lines.saturating_sub(visible_height);
    }
}

impl Default for WidgetView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for WidgetView {
    fn append_message(&mut self, role: Role, content: &str) {
        self.messages.push(Message {
            role,
            content: content.to_string(),
        });
        self.scroll_to_bottom();
    }

    fn show_typing(&mut self) {
        self.typing = true;
        self.animation_frame = 0;
        self.scroll_to_bottom();
    }

    fn remove_typing(&mut self) {
        self.typing = false;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
    }

    fn autosize_input(&mut self) {
        let lines = self.input.split('\n').count() as u16;
        self.input_height = lines.clamp(1, MAX_INPUT_LINES) + 2; // + borders
    }
}

pub struct App {
    pub should_quit: bool,
    pub view: WidgetView,
    pub controller: ChatController,
    pub client: ChatClient,
    pub endpoint: String,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            view: WidgetView::new(),
            controller: ChatController::new(),
            client: ChatClient::new(config.endpoint(), config.timeout_secs()),
            endpoint: config.endpoint().to_string(),
            events,
        }
    }

    /// The submit trigger: run admission control and, if the send is
    /// accepted, issue the network call on the runtime. The task's only
    /// interaction with widget state is the single `Reply` event it pushes
    /// back onto the loop.
    pub fn submit_input(&mut self) {
        let raw = self.view.input_text();
        let Some(text) = self.controller.begin_send(&mut self.view, &raw) else {
            return;
        };

        debug!("send accepted ({} chars)", text.chars().count());

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = client.send(&text).await;
            let _ = events.send(AppEvent::Reply(outcome));
        });
    }

    pub fn finish_send(&mut self, outcome: Result<String, SendError>) {
        self.controller.finish_send(&mut self.view, outcome);
    }
}
