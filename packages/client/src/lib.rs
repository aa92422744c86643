//! Realtime notification and chat synchronization client.
//!
//! Keeps a viewer's notification toasts and order chat threads in sync with
//! the FreelanceHub backend over a WebSocket, with periodic HTTP polling as a
//! fallback, and renders the dashboard widgets (live search, trending
//! services, user stats) from the HTTP API.

// layers
pub mod api;
pub mod domain;
pub mod dto;
pub mod render;
pub mod sync;
pub mod transport;

// front-end
pub mod terminal;

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::{ApiError, ClientError, TransportError};
pub use sync::{Command, RealtimeSyncClient, SyncHandle};
