//! WebSocket transport driver with reconnection support.
//!
//! The driver owns the socket. It reports every connection attempt, success,
//! failure and inbound frame to the client as a [`TransportSignal`], and
//! retries on its own schedule. The client never reconnects by itself.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    dto::conversion::{decode_inbound, encode_outbound},
    error::TransportError,
};

use super::{TransportEndpoint, TransportLink, TransportSignal, link};

pub const DEFAULT_RECONNECT_INTERVAL_SECS: u64 = 5;

/// Retry schedule of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive failed attempts before giving up; `None` retries forever
    pub max_attempts: Option<u32>,
    /// Delay between attempts
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            interval: Duration::from_secs(DEFAULT_RECONNECT_INTERVAL_SECS),
        }
    }
}

impl ReconnectPolicy {
    /// Check if the driver should attempt to reconnect.
    ///
    /// # Arguments
    ///
    /// * `failed_attempts` - Consecutive failures since the last successful connection
    pub fn should_attempt_reconnect(&self, failed_attempts: u32) -> bool {
        match self.max_attempts {
            Some(max_attempts) => failed_attempts < max_attempts,
            None => true,
        }
    }
}

/// How a single connection ended
#[derive(Debug)]
enum ConnectionEnd {
    /// The client dropped its side of the link
    ClientGone,
    /// The server closed the socket
    Closed(Option<String>),
    /// Protocol or I/O failure
    Failed(TransportError),
}

/// Spawn the driver on the current runtime and return the client side of the link
pub fn spawn_websocket_transport(
    url: String,
    policy: ReconnectPolicy,
) -> (TransportLink, JoinHandle<()>) {
    let (client, endpoint) = link();
    let handle = tokio::spawn(run_websocket_transport(url, policy, endpoint));
    (client, handle)
}

/// Run the driver until the client goes away or the retry policy gives up
pub async fn run_websocket_transport(
    url: String,
    policy: ReconnectPolicy,
    mut endpoint: TransportEndpoint,
) {
    let mut failed_attempts: u32 = 0;

    loop {
        if endpoint.signal(TransportSignal::Connecting).is_err() {
            return;
        }
        tracing::info!("Connecting to {} (attempt {})", url, failed_attempts + 1);

        let end = match connect_async(url.as_str()).await {
            Ok((ws_stream, _response)) => {
                failed_attempts = 0;
                tracing::info!("Connected to realtime server");
                if endpoint.signal(TransportSignal::Connected).is_err() {
                    return;
                }
                run_connection(ws_stream, &mut endpoint).await
            }
            Err(e) => ConnectionEnd::Failed(e.into()),
        };

        let signal = match end {
            ConnectionEnd::ClientGone => {
                tracing::info!("Client released the transport, stopping");
                return;
            }
            ConnectionEnd::Closed(reason) => {
                tracing::info!("Server closed the connection");
                TransportSignal::Closed(reason)
            }
            ConnectionEnd::Failed(error) => {
                tracing::warn!("Realtime connection error: {}", error);
                TransportSignal::Error(error.to_string())
            }
        };
        if endpoint.signal(signal).is_err() {
            return;
        }

        failed_attempts += 1;
        if !policy.should_attempt_reconnect(failed_attempts) {
            tracing::error!(
                "Failed to reconnect after {} attempts. Giving up.",
                failed_attempts
            );
            return;
        }

        tracing::info!("Reconnecting in {:?}...", policy.interval);
        if !wait_offline(policy.interval, &mut endpoint).await {
            return;
        }
    }
}

/// Sleep for `delay` while discarding events emitted during the outage.
///
/// Returns `false` when the client went away in the meantime.
async fn wait_offline(delay: Duration, endpoint: &mut TransportEndpoint) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            event = endpoint.outbound.recv() => match event {
                Some(event) => tracing::warn!("Dropping {:?} while disconnected", event),
                None => return false,
            },
        }
    }
}

async fn run_connection(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    endpoint: &mut TransportEndpoint,
) -> ConnectionEnd {
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let signal = match decode_inbound(text.as_str()) {
                        Ok(event) => TransportSignal::Event(event),
                        Err(e) => TransportSignal::Malformed(e.to_string()),
                    };
                    if endpoint.signal(signal).is_err() {
                        write.close().await.ok();
                        return ConnectionEnd::ClientGone;
                    }
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    return ConnectionEnd::Closed(frame.map(|f| f.reason.as_str().to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return ConnectionEnd::Failed(e.into()),
                None => return ConnectionEnd::Closed(None),
            },
            event = endpoint.outbound.recv() => match event {
                Some(event) => {
                    let text = match encode_outbound(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to encode {:?}: {}", event, e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        return ConnectionEnd::Failed(e.into());
                    }
                }
                None => {
                    write.close().await.ok();
                    return ConnectionEnd::ClientGone;
                }
            },
        }
    }
}
