//! View models for the page widgets.
//!
//! Renderers own the state of what is on screen and report every change as a
//! [`ViewUpdate`] through a [`ViewSink`]. A presenter (the terminal front-end
//! in `bin/client.rs`) turns those updates into output.

pub mod chat;
pub mod formatter;
pub mod notification;
pub mod widgets;

use tokio::sync::mpsc;

use crate::domain::ConnectionState;

pub use chat::{ChatElement, ChatEntry, ChatRenderer, HistoryToken};
pub use formatter::MessageFormatter;
pub use notification::{NotificationRenderer, Toast, ToastId, ToastVariant};
pub use widgets::{SearchPanel, StatsPanel, TrendingBoard};

/// One change to what the viewer sees
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    ConnectionChanged(ConnectionState),
    ToastShown(Toast),
    ToastRemoved(ToastId),
    BadgeChanged { count: usize },
    /// The chat log was replaced wholesale (history load or unmount)
    ChatReset(Vec<ChatElement>),
    ChatAppended(ChatEntry),
    /// A pending own message was matched by its rebroadcast
    ChatConfirmed(ChatEntry),
    Search(SearchPanel),
    Trending(TrendingBoard),
    Stats(StatsPanel),
}

/// Destination of view updates; painting never fails the caller
#[derive(Debug, Clone, Default)]
pub struct ViewSink {
    tx: Option<mpsc::UnboundedSender<ViewUpdate>>,
}

impl ViewSink {
    /// Sink feeding a presenter
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Sink with no presenter attached; updates are discarded
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn paint(&self, update: ViewUpdate) {
        if let Some(tx) = &self.tx
            && tx.send(update).is_err()
        {
            tracing::trace!("Presenter is gone, dropping view update");
        }
    }
}
