//! Message formatting utilities for terminal display.

use hubsync_shared::time::format_clock_time;

use crate::domain::ConnectionState;

use super::{
    chat::{ChatElement, ChatEntry, EMPTY_THREAD_NOTICE},
    notification::{Toast, ToastVariant},
    widgets::{
        NO_SERVICES_NOTICE, NO_TRENDING_NOTICE, SearchPanel, StatsPanel, TrendingBoard,
        format_money,
    },
};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a connection state change
    pub fn format_connection(state: ConnectionState) -> String {
        let label = match state {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting...",
            ConnectionState::Connected => "connected",
            ConnectionState::Errored => "connection error, waiting for retry",
        };
        format!("\n[realtime] {}\n", label)
    }

    /// Format a toast, numbered by its position on screen
    pub fn format_toast(position: usize, toast: &Toast) -> String {
        let marker = match toast.variant {
            ToastVariant::Success => "+",
            ToastVariant::Info => "*",
        };
        format!(
            "\n{} [{}] {} {}\n",
            marker, position, toast.title, toast.body
        )
    }

    /// Format the unread badge
    pub fn format_badge(count: usize) -> String {
        if count > 0 {
            format!("[notifications: {}]\n", count)
        } else {
            String::new()
        }
    }

    /// Format one chat entry
    ///
    /// # Arguments
    ///
    /// * `entry` - The entry to format
    ///
    /// # Returns
    ///
    /// A formatted string; own messages are marked "(me)", pending ones "(sending)"
    pub fn format_chat_entry(entry: &ChatEntry) -> String {
        let me_suffix = if entry.own { " (me)" } else { "" };
        let pending_suffix = if entry.pending { " (sending)" } else { "" };
        format!(
            "\n@{}{}: {}\n  at {}{}\n",
            entry.message.username,
            me_suffix,
            entry.message.message,
            format_clock_time(entry.message.timestamp_ms),
            pending_suffix
        )
    }

    /// Format the whole chat log after a reset
    pub fn format_chat_log(elements: &[ChatElement]) -> String {
        let mut output = String::new();
        output.push_str("\n\n");
        output.push_str(RULE);
        output.push('\n');

        for element in elements {
            match element {
                ChatElement::Placeholder => {
                    output.push_str(EMPTY_THREAD_NOTICE);
                    output.push('\n');
                }
                ChatElement::Message(entry) => {
                    output.push_str(&Self::format_chat_entry(entry));
                }
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the live search dropdown
    pub fn format_search(panel: &SearchPanel) -> String {
        match panel {
            SearchPanel::Hidden => String::new(),
            SearchPanel::Empty { query } => {
                format!("\nsearch '{}': {}\n", query, NO_SERVICES_NOTICE)
            }
            SearchPanel::Results { query, services } => {
                let mut output = format!("\nsearch '{}':\n", query);
                for service in services {
                    output.push_str(&format!(
                        "  #{} {} - by {} - {}\n",
                        service.id,
                        service.title,
                        service.freelancer,
                        format_money(service.price)
                    ));
                }
                output
            }
        }
    }

    /// Format the trending board
    pub fn format_trending(board: &TrendingBoard) -> String {
        if board.is_empty() {
            return format!("\nTrending: {}\n", NO_TRENDING_NOTICE);
        }

        let mut output = String::from("\nTrending:\n");
        for card in &board.cards {
            output.push_str(&format!(
                "  #{} {} {} - {} ({})\n",
                card.service_id, card.title, card.byline, card.price, card.orders
            ));
        }
        output
    }

    /// Format the user stats panel
    pub fn format_stats(panel: &StatsPanel) -> String {
        let mut output = String::from("\nStats:\n");
        for tile in &panel.tiles {
            output.push_str(&format!("  {}: {}\n", tile.label, tile.value));
        }
        output
    }
}
