//! Line-oriented terminal front-end.
//!
//! Reads commands typed at the prompt and prints [`ViewUpdate`]s as they
//! arrive, redisplaying the prompt after each one.

use std::io::Write;

use crate::{
    domain::{Room, UserId},
    render::{MessageFormatter, ToastId, ViewUpdate},
};

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// `/search <query>`, an empty query hides the results
    Search(String),
    /// `/join <room>`
    Join(Room),
    /// `/dismiss <n>`, 1-based position of the toast on screen
    Dismiss(usize),
    /// `/quit`
    Quit,
    /// Anything not starting with `/` is a chat message
    Chat(String),
    /// Unknown command or bad arguments, with a hint for the user
    Invalid(String),
}

/// Parse one input line
pub fn parse_line(line: &str) -> LineCommand {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return LineCommand::Chat(line.to_string());
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match name {
        "search" => LineCommand::Search(argument.to_string()),
        "join" => parse_room(argument)
            .map(LineCommand::Join)
            .unwrap_or_else(|| LineCommand::Invalid("usage: /join <room>".to_string())),
        "dismiss" => match argument.parse::<usize>() {
            Ok(position) if position > 0 => LineCommand::Dismiss(position),
            _ => LineCommand::Invalid("usage: /dismiss <n>".to_string()),
        },
        "quit" | "exit" => LineCommand::Quit,
        _ => LineCommand::Invalid(format!("unknown command '/{}'", name)),
    }
}

/// `user_<id>` names a user room, anything else is taken verbatim
fn parse_room(argument: &str) -> Option<Room> {
    if argument.is_empty() {
        return None;
    }
    match argument.strip_prefix("user_") {
        Some(id) => UserId::new(id).ok().map(Room::User),
        None => Some(Room::Named(argument.to_string())),
    }
}

/// Redisplay the prompt after printing
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}

/// Prints view updates and remembers which toasts are on screen
#[derive(Debug)]
pub struct Presenter {
    prompt: String,
    toasts: Vec<ToastId>,
}

impl Presenter {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            toasts: Vec::new(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Toast at 1-based `position`
    pub fn toast_at(&self, position: usize) -> Option<ToastId> {
        position
            .checked_sub(1)
            .and_then(|index| self.toasts.get(index))
            .copied()
    }

    /// Text to print for `update`, if any
    pub fn render(&mut self, update: &ViewUpdate) -> Option<String> {
        let output = match update {
            ViewUpdate::ConnectionChanged(state) => MessageFormatter::format_connection(*state),
            ViewUpdate::ToastShown(toast) => {
                self.toasts.push(toast.id);
                MessageFormatter::format_toast(self.toasts.len(), toast)
            }
            ViewUpdate::ToastRemoved(id) => {
                self.toasts.retain(|shown| shown != id);
                return None;
            }
            ViewUpdate::BadgeChanged { count } => MessageFormatter::format_badge(*count),
            ViewUpdate::ChatReset(elements) => MessageFormatter::format_chat_log(elements),
            ViewUpdate::ChatAppended(entry) => MessageFormatter::format_chat_entry(entry),
            ViewUpdate::ChatConfirmed(_) => return None,
            ViewUpdate::Search(panel) => MessageFormatter::format_search(panel),
            ViewUpdate::Trending(board) => MessageFormatter::format_trending(board),
            ViewUpdate::Stats(panel) => MessageFormatter::format_stats(panel),
        };

        (!output.is_empty()).then_some(output)
    }

    /// Print `update` and redisplay the prompt
    pub fn show(&mut self, update: &ViewUpdate) {
        if let Some(output) = self.render(update) {
            print!("{}", output);
            redisplay_prompt(&self.prompt);
        }
    }
}
