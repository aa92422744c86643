//! Chat log of the current thread view.
//!
//! ## Ordering
//!
//! The log is append-only and ordered by arrival at the client, never by
//! `timestamp_ms`. While a history load is outstanding, live messages are
//! buffered and flushed right after the history lands, in arrival order, so
//! the result does not depend on which network call finishes first.

use crate::{
    domain::{ChatMessage, Session, ThreadId},
    error::ApiError,
};

use super::{ViewSink, ViewUpdate};

pub const EMPTY_THREAD_NOTICE: &str = "No messages yet. Start the conversation!";

/// Maximum clock skew between an optimistic entry and its rebroadcast
pub const ECHO_MATCH_WINDOW_MS: u64 = 10_000;

/// One rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub message: ChatMessage,
    /// Authored by the session user
    pub own: bool,
    /// Shown optimistically, not yet rebroadcast by the backend
    pub pending: bool,
}

/// One element of the chat container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatElement {
    /// "No messages yet" notice shown for an empty thread
    Placeholder,
    Message(ChatEntry),
}

/// Identifies one `load_history` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryToken(u64);

#[derive(Debug)]
enum HistoryState {
    Idle,
    Loading {
        token: HistoryToken,
        buffered: Vec<ChatMessage>,
    },
}

pub struct ChatRenderer {
    session: Session,
    elements: Vec<ChatElement>,
    history: HistoryState,
    next_token: u64,
    view: ViewSink,
}

impl ChatRenderer {
    pub fn new(session: Session, view: ViewSink) -> Self {
        Self {
            session,
            elements: Vec::new(),
            history: HistoryState::Idle,
            next_token: 0,
            view,
        }
    }

    /// Start loading the history of `thread_id`.
    ///
    /// Live messages are held back until [`complete_history`](Self::complete_history)
    /// is called with the returned token. A newer load supersedes an older one;
    /// messages buffered by the older load are kept.
    pub fn load_history(&mut self, thread_id: &ThreadId) -> HistoryToken {
        self.next_token += 1;
        let token = HistoryToken(self.next_token);

        let buffered = match std::mem::replace(&mut self.history, HistoryState::Idle) {
            HistoryState::Loading { buffered, .. } => buffered,
            HistoryState::Idle => Vec::new(),
        };
        self.history = HistoryState::Loading { token, buffered };

        tracing::debug!("Loading chat history of thread {} ({:?})", thread_id, token);
        token
    }

    /// Whether a history load is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.history, HistoryState::Loading { .. })
    }

    /// Apply the outcome of the load identified by `token`.
    ///
    /// Returns `false` when the token is stale and the result was ignored.
    pub fn complete_history(
        &mut self,
        token: HistoryToken,
        result: Result<Vec<ChatMessage>, ApiError>,
    ) -> bool {
        let buffered = match std::mem::replace(&mut self.history, HistoryState::Idle) {
            HistoryState::Loading {
                token: current,
                buffered,
            } if current == token => buffered,
            other => {
                tracing::debug!("Ignoring stale chat history {:?}", token);
                self.history = other;
                return false;
            }
        };

        match result {
            Ok(messages) => {
                let pending: Vec<ChatElement> = self
                    .elements
                    .drain(..)
                    .filter(|element| {
                        matches!(element, ChatElement::Message(entry) if entry.pending)
                    })
                    .collect();

                self.elements = messages
                    .into_iter()
                    .map(|message| ChatElement::Message(self.entry(message, false)))
                    .collect();
                self.elements.extend(pending);

                if self.elements.is_empty() && buffered.is_empty() {
                    self.elements.push(ChatElement::Placeholder);
                }
                self.view.paint(ViewUpdate::ChatReset(self.elements.clone()));
            }
            Err(e) => {
                tracing::warn!("Error loading chat messages: {}", e);
            }
        }

        for message in buffered {
            self.insert(message);
        }
        true
    }

    /// Add a live message at the end of the log
    pub fn append(&mut self, message: ChatMessage) {
        if let HistoryState::Loading { buffered, .. } = &mut self.history {
            buffered.push(message);
            return;
        }
        self.insert(message);
    }

    /// Show the session user's own message before the backend echoes it
    pub fn append_pending(&mut self, message: ChatMessage) {
        let entry = self.entry(message, true);
        self.push_entry(entry);
    }

    /// Discard the log when the thread view goes away
    pub fn unmount(&mut self) {
        self.elements.clear();
        self.history = HistoryState::Idle;
        self.view.paint(ViewUpdate::ChatReset(Vec::new()));
    }

    pub fn elements(&self) -> &[ChatElement] {
        &self.elements
    }

    /// Rendered messages, placeholder excluded
    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.elements.iter().filter_map(|element| match element {
            ChatElement::Message(entry) => Some(entry),
            ChatElement::Placeholder => None,
        })
    }

    fn entry(&self, message: ChatMessage, pending: bool) -> ChatEntry {
        ChatEntry {
            own: self.session.is_own(&message.user_id),
            message,
            pending,
        }
    }

    fn insert(&mut self, message: ChatMessage) {
        if self.session.is_own(&message.user_id) && self.confirm_pending(&message) {
            return;
        }
        let entry = self.entry(message, false);
        self.push_entry(entry);
    }

    fn push_entry(&mut self, entry: ChatEntry) {
        self.elements
            .retain(|element| !matches!(element, ChatElement::Placeholder));
        self.elements.push(ChatElement::Message(entry.clone()));
        self.view.paint(ViewUpdate::ChatAppended(entry));
    }

    /// Replace the oldest matching pending entry with its rebroadcast
    fn confirm_pending(&mut self, message: &ChatMessage) -> bool {
        let matched = self.elements.iter_mut().find_map(|element| match element {
            ChatElement::Message(entry)
                if entry.pending
                    && entry.message.message == message.message
                    && entry.message.timestamp_ms.abs_diff(message.timestamp_ms)
                        <= ECHO_MATCH_WINDOW_MS =>
            {
                Some(entry)
            }
            _ => None,
        });

        match matched {
            Some(entry) => {
                entry.message = message.clone();
                entry.pending = false;
                let confirmed = entry.clone();
                self.view.paint(ViewUpdate::ChatConfirmed(confirmed));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn message(user_id: &str, text: &str, timestamp_ms: i64) -> ChatMessage {
        ChatMessage {
            user_id: user_id.to_string(),
            username: format!("user{}", user_id),
            message: text.to_string(),
            timestamp_ms,
        }
    }

    fn create_test_renderer() -> ChatRenderer {
        let session = Session::new(
            Some(UserId::new("1").unwrap()),
            Some(ThreadId::new("42").unwrap()),
        );
        ChatRenderer::new(session, ViewSink::detached())
    }

    fn texts(renderer: &ChatRenderer) -> Vec<String> {
        renderer
            .entries()
            .map(|entry| entry.message.message.clone())
            .collect()
    }

    #[test]
    fn test_append_keeps_call_order_regardless_of_timestamps() {
        // テスト項目: タイムスタンプに関係なく追加順に表示される
        // given (前提条件):
        let mut renderer = create_test_renderer();

        // when (操作):
        renderer.append(message("2", "first", 3_000));
        renderer.append(message("2", "second", 1_000));
        renderer.append(message("2", "third", 2_000));

        // then (期待する結果):
        assert_eq!(texts(&renderer), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_history_shows_single_placeholder_until_append() {
        // テスト項目: 空の履歴ではプレースホルダーが 1 つだけ表示され、追加時に消える
        // given (前提条件):
        let mut renderer = create_test_renderer();
        let token = renderer.load_history(&ThreadId::new("42").unwrap());

        // when (操作):
        renderer.complete_history(token, Ok(vec![]));
        let before_append = renderer.elements().to_vec();
        renderer.append(message("2", "hello", 1_000));

        // then (期待する結果):
        assert_eq!(before_append, vec![ChatElement::Placeholder]);
        assert_eq!(renderer.elements().len(), 1);
        assert!(matches!(renderer.elements()[0], ChatElement::Message(_)));
    }

    #[test]
    fn test_live_messages_during_load_follow_history() {
        // テスト項目: 履歴読み込み中に届いたメッセージは履歴の後に到着順で表示される
        // given (前提条件):
        let mut renderer = create_test_renderer();
        let token = renderer.load_history(&ThreadId::new("42").unwrap());

        // when (操作):
        renderer.append(message("2", "live 1", 5_000));
        renderer.append(message("2", "live 2", 6_000));
        let during = renderer.entries().count();
        renderer.complete_history(
            token,
            Ok(vec![message("2", "old 1", 1_000), message("1", "old 2", 2_000)]),
        );

        // then (期待する結果):
        assert_eq!(during, 0);
        assert_eq!(texts(&renderer), vec!["old 1", "old 2", "live 1", "live 2"]);
        assert!(!renderer.is_loading());
    }

    #[test]
    fn test_live_message_into_empty_history_has_no_placeholder() {
        // テスト項目: 空の履歴でもバッファ済みメッセージがあればプレースホルダーは表示されない
        // given (前提条件):
        let mut renderer = create_test_renderer();
        let token = renderer.load_history(&ThreadId::new("42").unwrap());
        renderer.append(message("2", "live", 5_000));

        // when (操作):
        renderer.complete_history(token, Ok(vec![]));

        // then (期待する結果):
        assert_eq!(renderer.elements().len(), 1);
        assert!(!renderer.elements().contains(&ChatElement::Placeholder));
    }

    #[test]
    fn test_stale_history_is_ignored() {
        // テスト項目: 古いトークンの履歴結果は無視される
        // given (前提条件):
        let mut renderer = create_test_renderer();
        let thread_id = ThreadId::new("42").unwrap();
        let stale = renderer.load_history(&thread_id);
        let current = renderer.load_history(&thread_id);

        // when (操作):
        let applied_stale = renderer.complete_history(stale, Ok(vec![message("2", "stale", 1)]));
        let applied_current =
            renderer.complete_history(current, Ok(vec![message("2", "fresh", 2)]));

        // then (期待する結果):
        assert!(!applied_stale);
        assert!(applied_current);
        assert_eq!(texts(&renderer), vec!["fresh"]);
    }

    #[test]
    fn test_failed_history_still_flushes_buffer() {
        // テスト項目: 履歴の取得に失敗してもバッファ済みメッセージは表示される
        // given (前提条件):
        let mut renderer = create_test_renderer();
        let token = renderer.load_history(&ThreadId::new("42").unwrap());
        renderer.append(message("2", "live", 5_000));

        // when (操作):
        renderer.complete_history(
            token,
            Err(ApiError::Status {
                endpoint: "/api/chat/42".to_string(),
                status: 403,
            }),
        );

        // then (期待する結果):
        assert_eq!(texts(&renderer), vec!["live"]);
    }

    #[test]
    fn test_own_messages_are_marked() {
        // テスト項目: セッションユーザーのメッセージは own としてマークされる
        // given (前提条件):
        let mut renderer = create_test_renderer();

        // when (操作):
        renderer.append(message("1", "mine", 1));
        renderer.append(message("2", "theirs", 2));

        // then (期待する結果):
        let own: Vec<bool> = renderer.entries().map(|entry| entry.own).collect();
        assert_eq!(own, vec![true, false]);
    }

    #[test]
    fn test_pending_entry_confirmed_by_rebroadcast() {
        // テスト項目: 楽観的に表示した自分のメッセージは再配信で確定され、重複しない
        // given (前提条件):
        let mut renderer = create_test_renderer();
        renderer.append_pending(message("1", "hello", 10_000));

        // when (操作):
        renderer.append(message("1", "hello", 12_000));

        // then (期待する結果):
        let entries: Vec<&ChatEntry> = renderer.entries().collect();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].pending);
        assert_eq!(entries[0].message.timestamp_ms, 12_000);
    }

    #[test]
    fn test_rebroadcast_outside_window_appends() {
        // テスト項目: 時刻差が許容範囲を超える再配信は別メッセージとして追加される
        // given (前提条件):
        let mut renderer = create_test_renderer();
        renderer.append_pending(message("1", "hello", 10_000));

        // when (操作):
        renderer.append(message("1", "hello", 10_000 + ECHO_MATCH_WINDOW_MS as i64 + 1));

        // then (期待する結果):
        let pending: Vec<bool> = renderer.entries().map(|entry| entry.pending).collect();
        assert_eq!(pending, vec![true, false]);
    }

    #[test]
    fn test_rebroadcast_with_extreme_timestamp_appends() {
        // テスト項目: 極端な時刻 (i64::MIN) の再配信でもパニックせず、別メッセージとして追加される
        // given (前提条件):
        let mut renderer = create_test_renderer();
        renderer.append_pending(message("1", "hi", 1_700_000_000_000));

        // when (操作):
        renderer.append(message("1", "hi", i64::MIN));

        // then (期待する結果):
        let pending: Vec<bool> = renderer.entries().map(|entry| entry.pending).collect();
        assert_eq!(pending, vec![true, false]);
    }

    #[test]
    fn test_unmount_discards_log() {
        // テスト項目: アンマウント時にログが破棄される
        // given (前提条件):
        let mut renderer = create_test_renderer();
        renderer.append(message("2", "hello", 1));

        // when (操作):
        renderer.unmount();

        // then (期待する結果):
        assert!(renderer.elements().is_empty());
    }
}
