//! Domain model of the sync client.
//!
//! Pure types and state transitions with no I/O, so they can be tested
//! without a transport or a backend.

pub mod connection;
pub mod entity;
pub mod value_object;

use thiserror::Error;

pub use connection::{ConnectionState, RoomMembership};
pub use entity::{
    ChatMessage, Notification, NotificationKind, ServiceSummary, TrendingService, UserStats,
};
pub use value_object::{Room, Session, ThreadId, UserId};

/// Validation errors for value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
