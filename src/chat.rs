use crate::api::SendError;

/// Who authored a rendered chat row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

/// One rendered chat row. Immutable once appended; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Rendering capabilities the controller calls into. Implementations hold no
/// decision logic of their own; `remove_typing` must be idempotent.
pub trait ChatView {
    /// Renders a new row and scrolls the log to its end.
    fn append_message(&mut self, role: Role, content: &str);
    fn show_typing(&mut self);
    fn remove_typing(&mut self);
    fn set_busy(&mut self, busy: bool);
    fn input_text(&self) -> String;
    fn clear_input(&mut self);
    fn focus_input(&mut self);
    fn autosize_input(&mut self);
}

/// The send lifecycle: Idle -> Sending -> Idle. Failures route back to Idle
/// after rendering an error row; a rejected or failed send is terminal for
/// that message.
///
/// The network call itself happens between `begin_send` and `finish_send`,
/// driven by the caller on the runtime. `busy` is checked synchronously in
/// `begin_send` and only cleared in `finish_send`, so at most one request is
/// ever outstanding per controller.
pub struct ChatController {
    busy: bool,
}

impl ChatController {
    pub fn new() -> Self {
        Self { busy: false }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Admission control plus the acceptance side effects, in order: clear
    /// and re-size the input, render the user row, show the typing
    /// placeholder, mark busy. Returns the trimmed text to transmit, or
    /// `None` when the input is blank or a send is already in flight (a
    /// silent no-op either way).
    pub fn begin_send<V: ChatView>(&mut self, view: &mut V, raw_text: &str) -> Option<String> {
        let text = raw_text.trim();
        if text.is_empty() || self.busy {
            return None;
        }

        view.clear_input();
        view.autosize_input();
        view.append_message(Role::User, text);
        view.show_typing();
        self.busy = true;
        view.set_busy(true);

        Some(text.to_string())
    }

    /// Settles the in-flight send: the placeholder comes down first, then
    /// exactly one terminal row goes up. Runs for every outcome, so busy is
    /// always released and focus always returns to the input.
    pub fn finish_send<V: ChatView>(&mut self, view: &mut V, outcome: Result<String, SendError>) {
        view.remove_typing();

        match outcome {
            Ok(reply) => view.append_message(Role::Ai, &reply),
            Err(err) => view.append_message(Role::Ai, &format!("Error: {err}")),
        }

        self.busy = false;
        view.set_busy(false);
        view.focus_input();
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}
