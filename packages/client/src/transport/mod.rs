//! Realtime transport seam.
//!
//! The sync client talks to the transport through a pair of channels: it
//! pushes [`OutboundEvent`]s and receives [`TransportSignal`]s. Whatever sits
//! on the other end (the WebSocket driver, or a test harness) owns the
//! connection and its retry policy.

pub mod websocket;

use tokio::sync::mpsc;

use crate::{
    domain::{ChatMessage, Notification, Room, ThreadId},
    error::TransportError,
};

pub use websocket::{ReconnectPolicy, run_websocket_transport, spawn_websocket_transport};

/// Typed inbound event, decoded from one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Notification(Notification),
    NewMessage(ChatMessage),
    RoomJoined { room: String },
    Unknown { event: String },
}

/// Event the client emits on the realtime channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    JoinRoom(Room),
    SendMessage { thread_id: ThreadId, message: String },
}

/// Everything the transport reports to the client, in delivery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSignal {
    Connecting,
    Connected,
    Error(String),
    Closed(Option<String>),
    Event(InboundEvent),
    /// A frame arrived that could not be decoded
    Malformed(String),
}

/// Sending half used by the client to emit events
#[derive(Debug, Clone)]
pub struct OutboundSender {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl OutboundSender {
    /// Queue `event` for the transport; fails only when the transport is gone
    pub fn emit(&self, event: OutboundEvent) -> Result<(), TransportError> {
        self.tx.send(event).map_err(|_| TransportError::LinkClosed)
    }
}

/// Client side of the transport
pub struct TransportLink {
    pub outbound: OutboundSender,
    pub signals: mpsc::UnboundedReceiver<TransportSignal>,
}

/// Transport side of the link
pub struct TransportEndpoint {
    pub outbound: mpsc::UnboundedReceiver<OutboundEvent>,
    pub signals: mpsc::UnboundedSender<TransportSignal>,
}

impl TransportEndpoint {
    /// Report `signal` to the client; fails once the client is gone
    pub fn signal(&self, signal: TransportSignal) -> Result<(), TransportError> {
        self.signals
            .send(signal)
            .map_err(|_| TransportError::LinkClosed)
    }
}

/// Create a connected client/transport pair
pub fn link() -> (TransportLink, TransportEndpoint) {
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();

    (
        TransportLink {
            outbound: OutboundSender { tx: outbound_tx },
            signals: signal_rx,
        },
        TransportEndpoint {
            outbound: outbound_rx,
            signals: signal_tx,
        },
    )
}
