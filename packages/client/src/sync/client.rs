//! The realtime sync client.
//!
//! One [`RealtimeSyncClient`] owns everything that changes while a page is
//! open: connection state, room membership, the notification and chat
//! renderers, and the background fetches. All of it is driven from a single
//! `select!` loop, so no locking is needed.

use std::{sync::Arc, time::Duration};

use hubsync_shared::time::Clock;
use tokio::{
    sync::mpsc,
    task::JoinSet,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    api::HubApi,
    config::ClientConfig,
    domain::{
        ChatMessage, ConnectionState, Notification, Room, RoomMembership, ServiceSummary, Session,
        ThreadId, TrendingService, UserStats, connection::LinkEvent,
    },
    error::{ApiError, ClientError},
    render::{
        ChatRenderer, HistoryToken, NotificationRenderer, SearchPanel, StatsPanel, ToastId,
        TrendingBoard, ViewSink, ViewUpdate,
    },
    transport::{InboundEvent, OutboundEvent, OutboundSender, TransportSignal},
};

use super::search::{LiveSearch, SearchInput};

/// Display name of an optimistic entry until the backend echo replaces it
const OPTIMISTIC_USERNAME: &str = "you";

/// Front-end requests handled by the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    JoinRoom(Room),
    SendChatMessage { thread_id: String, text: String },
    SearchInput(String),
    DismissToast(ToastId),
    Shutdown,
}

/// Cloneable handle for sending [`Command`]s to a running client
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl SyncHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, command: Command) -> Result<(), ClientError> {
        self.tx
            .send(command)
            .map_err(|_| ClientError::Connection("sync client has stopped".to_string()))
    }

    pub fn join_room(&self, room: Room) -> Result<(), ClientError> {
        self.send(Command::JoinRoom(room))
    }

    pub fn send_chat_message(
        &self,
        thread_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.send(Command::SendChatMessage {
            thread_id: thread_id.into(),
            text: text.into(),
        })
    }

    pub fn search(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.send(Command::SearchInput(text.into()))
    }

    pub fn dismiss_toast(&self, id: ToastId) -> Result<(), ClientError> {
        self.send(Command::DismissToast(id))
    }

    pub fn shutdown(&self) -> Result<(), ClientError> {
        self.send(Command::Shutdown)
    }
}

/// Result of a background fetch, delivered back to the loop
#[derive(Debug)]
enum Completion {
    Notifications(Result<Vec<Notification>, ApiError>),
    History(HistoryToken, Result<Vec<ChatMessage>, ApiError>),
    Search {
        query: String,
        result: Result<Vec<ServiceSummary>, ApiError>,
    },
    Trending(Result<Vec<TrendingService>, ApiError>),
    Stats(Result<UserStats, ApiError>),
}

pub struct RealtimeSyncClient {
    session: Session,
    state: ConnectionState,
    membership: RoomMembership,
    outbound: Option<OutboundSender>,
    api: Arc<dyn HubApi>,
    clock: Arc<dyn Clock>,
    notifications: NotificationRenderer,
    chat: ChatRenderer,
    search: LiveSearch,
    tasks: JoinSet<Completion>,
    poll_interval: Duration,
    optimistic_echo: bool,
    view: ViewSink,
}

impl RealtimeSyncClient {
    pub fn new(
        config: &ClientConfig,
        api: Arc<dyn HubApi>,
        outbound: OutboundSender,
        clock: Arc<dyn Clock>,
        view: ViewSink,
    ) -> Self {
        let session = config.session();

        Self {
            state: ConnectionState::Disconnected,
            membership: RoomMembership::new(),
            outbound: Some(outbound),
            api,
            notifications: NotificationRenderer::new(
                Arc::clone(&clock),
                config.toast_ttl.as_millis() as i64,
                view.clone(),
            ),
            chat: ChatRenderer::new(session.clone(), view.clone()),
            search: LiveSearch::new(config.search_debounce),
            tasks: JoinSet::new(),
            poll_interval: config.poll_interval,
            optimistic_echo: config.optimistic_echo,
            clock,
            session,
            view,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn membership(&self) -> &RoomMembership {
        &self.membership
    }

    pub fn notifications(&self) -> &NotificationRenderer {
        &self.notifications
    }

    pub fn chat(&self) -> &ChatRenderer {
        &self.chat
    }

    /// Run until a `Shutdown` command arrives or every [`SyncHandle`] is dropped
    pub async fn run(
        mut self,
        mut signals: mpsc::UnboundedReceiver<TransportSignal>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        self.mount();

        // First tick fires immediately, giving the startup poll
        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut transport_open = true;

        loop {
            let search_deadline = self.search.deadline();
            let toast_deadline = self
                .notifications
                .next_expiry_in()
                .map(|left| Instant::now() + left);

            tokio::select! {
                _ = poll.tick() => self.poll_notifications(),
                _ = tokio::time::sleep_until(toast_deadline.unwrap_or_else(Instant::now)),
                    if toast_deadline.is_some() => {
                    self.notifications.sweep_expired();
                }
                signal = signals.recv(), if transport_open => match signal {
                    Some(signal) => self.handle_signal(signal),
                    None => {
                        transport_open = false;
                        tracing::warn!("Realtime transport stopped, continuing with polling only");
                        self.set_state(ConnectionState::Disconnected);
                    }
                },
                Some(joined) = self.tasks.join_next() => match joined {
                    Ok(completion) => self.handle_completion(completion),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => tracing::error!("Background fetch panicked: {}", e),
                },
                _ = tokio::time::sleep_until(search_deadline.unwrap_or_else(Instant::now)),
                    if search_deadline.is_some() => self.fire_search(),
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
            }
        }

        self.teardown();
    }

    /// Start the page: queue room joins and kick off the one-shot fetches
    pub fn mount(&mut self) {
        if let Some(user_id) = self.session.user_id.clone() {
            self.join_room(Room::User(user_id.clone()));

            let api = Arc::clone(&self.api);
            self.tasks
                .spawn(async move { Completion::Stats(api.user_stats(&user_id).await) });
        }

        if let Some(thread_id) = self.session.thread_id.clone() {
            self.join_room(Room::for_thread(&thread_id));
            self.load_history(thread_id);
        }

        let api = Arc::clone(&self.api);
        self.tasks
            .spawn(async move { Completion::Trending(api.trending_services().await) });
    }

    /// Apply one transport report
    pub fn handle_signal(&mut self, signal: TransportSignal) {
        match signal {
            TransportSignal::Connecting => self.apply_link_event(LinkEvent::Connecting),
            TransportSignal::Connected => {
                tracing::info!("Socket connected successfully");
                self.apply_link_event(LinkEvent::Connected);
            }
            TransportSignal::Error(reason) => {
                tracing::warn!("Socket connection error: {}", reason);
                self.apply_link_event(LinkEvent::Error);
            }
            TransportSignal::Closed(reason) => {
                tracing::info!(
                    "Socket closed: {}",
                    reason.as_deref().unwrap_or("no reason given")
                );
                self.apply_link_event(LinkEvent::Closed);
            }
            TransportSignal::Event(event) => self.dispatch(event),
            TransportSignal::Malformed(reason) => {
                tracing::warn!("Dropping malformed frame: {}", reason);
            }
        }
    }

    /// Ask to be in `room`, now if connected, otherwise on the next connection
    pub fn join_room(&mut self, room: Room) {
        if !self.membership.insert(room.clone()) {
            tracing::debug!("Already a member of room '{}'", room);
        }
        if self.state == ConnectionState::Connected {
            self.emit(OutboundEvent::JoinRoom(room));
        }
    }

    /// Send a chat message to `thread_id`.
    ///
    /// Blank text or an unknown thread is silently ignored. Returns whether an
    /// event was emitted.
    pub fn send_chat_message(&mut self, thread_id: &str, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Ok(thread_id) = ThreadId::new(thread_id) else {
            return false;
        };

        // Offline sends are dropped by the driver, so no rebroadcast would confirm them
        let echo = self.optimistic_echo
            && self.state == ConnectionState::Connected
            && self.session.thread_id.as_ref() == Some(&thread_id);
        let sent = self.emit(OutboundEvent::SendMessage {
            thread_id,
            message: text.to_string(),
        });

        if sent
            && echo
            && let Some(user_id) = &self.session.user_id
        {
            let local = ChatMessage {
                user_id: user_id.as_str().to_string(),
                username: OPTIMISTIC_USERNAME.to_string(),
                message: text.to_string(),
                timestamp_ms: self.clock.now_millis(),
            };
            self.chat.append_pending(local);
        }
        sent
    }

    /// Fetch the notification list in the background
    pub fn poll_notifications(&mut self) {
        let api = Arc::clone(&self.api);
        self.tasks
            .spawn(async move { Completion::Notifications(api.notifications().await) });
    }

    /// Stop everything: pending fetches, toasts, the chat view and the transport link
    pub fn teardown(&mut self) {
        self.tasks.abort_all();
        self.notifications.clear();
        if self.session.thread_id.is_some() {
            self.chat.unmount();
        }
        self.outbound = None;
        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Sync client torn down");
    }

    fn apply_link_event(&mut self, event: LinkEvent) {
        let next = self.state.transition(event);
        let fresh = self.state.enters_connected(next);
        self.set_state(next);

        if fresh {
            let rooms: Vec<Room> = self.membership.iter().cloned().collect();
            for room in rooms {
                self.emit(OutboundEvent::JoinRoom(room));
            }
        }
    }

    fn set_state(&mut self, next: ConnectionState) {
        if self.state != next {
            tracing::debug!("Connection state {:?} -> {:?}", self.state, next);
            self.state = next;
            self.view.paint(ViewUpdate::ConnectionChanged(next));
        }
    }

    fn emit(&self, event: OutboundEvent) -> bool {
        let Some(outbound) = &self.outbound else {
            return false;
        };
        match outbound.emit(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to emit event: {}", e);
                false
            }
        }
    }

    fn dispatch(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Notification(notification) => {
                self.notifications.render(&notification);
            }
            InboundEvent::NewMessage(message) => {
                if self.session.thread_id.is_some() {
                    self.chat.append(message);
                } else {
                    tracing::debug!("No chat view open, ignoring message");
                }
            }
            InboundEvent::RoomJoined { room } => {
                tracing::info!("Joined room: {}", room);
            }
            InboundEvent::Unknown { event } => {
                tracing::debug!("Ignoring unknown event '{}'", event);
            }
        }
    }

    fn load_history(&mut self, thread_id: ThreadId) {
        let token = self.chat.load_history(&thread_id);
        let api = Arc::clone(&self.api);
        self.tasks.spawn(async move {
            Completion::History(token, api.chat_history(&thread_id).await)
        });
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::JoinRoom(room) => self.join_room(room),
            Command::SendChatMessage { thread_id, text } => {
                if !self.send_chat_message(&thread_id, &text) {
                    tracing::debug!("Chat message not sent");
                }
            }
            Command::SearchInput(text) => {
                if self.search.input(&text, Instant::now()) == SearchInput::Hide {
                    self.view.paint(ViewUpdate::Search(SearchPanel::Hidden));
                }
            }
            Command::DismissToast(id) => {
                self.notifications.dismiss(id);
            }
            Command::Shutdown => {}
        }
    }

    fn fire_search(&mut self) {
        let Some(query) = self.search.fire(Instant::now()) else {
            return;
        };
        let api = Arc::clone(&self.api);
        self.tasks.spawn(async move {
            let result = api.search_services(&query).await;
            Completion::Search { query, result }
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Notifications(Ok(notifications)) => {
                self.notifications.set_unread(notifications.len());
                for notification in &notifications {
                    self.notifications.render(notification);
                }
            }
            Completion::Notifications(Err(e)) => {
                tracing::warn!("Error fetching notifications: {}", e);
            }
            Completion::History(token, result) => {
                self.chat.complete_history(token, result);
            }
            Completion::Search { query, result } => {
                if !self.search.accepts(&query) {
                    tracing::debug!("Discarding results of superseded search '{}'", query);
                    return;
                }
                match result {
                    Ok(services) => self.view.paint(ViewUpdate::Search(
                        SearchPanel::from_results(&query, services),
                    )),
                    Err(e) => tracing::warn!("Error performing live search: {}", e),
                }
            }
            Completion::Trending(Ok(services)) => {
                self.view
                    .paint(ViewUpdate::Trending(TrendingBoard::from_services(services)));
            }
            Completion::Trending(Err(e)) => {
                tracing::warn!("Error fetching trending services: {}", e);
            }
            Completion::Stats(Ok(stats)) => {
                self.view
                    .paint(ViewUpdate::Stats(StatsPanel::from_stats(&stats)));
            }
            Completion::Stats(Err(e)) => {
                tracing::warn!("Error fetching user stats: {}", e);
            }
        }
    }
}
