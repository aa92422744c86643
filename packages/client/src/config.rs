//! Client configuration.

use std::time::Duration;

use crate::{
    domain::{Session, ThreadId, UserId},
    error::ClientError,
    render::notification::DEFAULT_TOAST_TTL_MS,
    sync::search::DEFAULT_SEARCH_DEBOUNCE_MS,
    transport::ReconnectPolicy,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:5000/ws";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Everything needed to run one client session
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the HTTP API
    pub base_url: String,
    /// URL of the realtime WebSocket endpoint
    pub ws_url: String,
    /// Current viewer, if logged in
    pub user_id: Option<String>,
    /// Chat thread (order id) of the current view, if any
    pub thread_id: Option<String>,
    pub poll_interval: Duration,
    pub toast_ttl: Duration,
    pub search_debounce: Duration,
    pub reconnect: ReconnectPolicy,
    /// Show own chat messages before the backend echoes them
    pub optimistic_echo: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            user_id: None,
            thread_id: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            toast_ttl: Duration::from_millis(DEFAULT_TOAST_TTL_MS as u64),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            reconnect: ReconnectPolicy::default(),
            optimistic_echo: false,
        }
    }
}

impl ClientConfig {
    /// Check values that would otherwise fail later at runtime
    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must be http(s): '{}'",
                self.base_url
            )));
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(ClientError::Config(format!(
                "WebSocket URL must be ws(s): '{}'",
                self.ws_url
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(ClientError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Session derived from the configured ids.
    ///
    /// Blank ids count as absent, which turns the matching features into no-ops.
    pub fn session(&self) -> Session {
        Session::new(
            self.user_id.as_deref().and_then(|id| UserId::new(id).ok()),
            self.thread_id.as_deref().and_then(|id| ThreadId::new(id).ok()),
        )
    }
}
