//! Realtime channel frames.
//!
//! Every WebSocket text frame is an envelope `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

pub const EVENT_NOTIFICATION: &str = "notification";
pub const EVENT_NEW_MESSAGE: &str = "new_message";
pub const EVENT_ROOM_JOINED: &str = "room_joined";
pub const EVENT_JOIN_ROOM: &str = "join_room";
pub const EVENT_SEND_MESSAGE: &str = "send_message";

/// Event envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Identifier that the backend may send as a string or as an integer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

/// Timestamp that the backend may send as Unix milliseconds or ISO-8601 text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    Text(String),
}

fn default_notification_type() -> String {
    "info".to_string()
}

/// Payload of `notification`, also the item shape of `/api/notifications`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    pub message: String,
    #[serde(rename = "type", default = "default_notification_type")]
    pub kind: String,
}

/// Payload of `new_message`, also the item shape of `/api/chat/:id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessagePayload {
    pub user_id: WireId,
    pub username: String,
    pub message: String,
    pub timestamp: WireTimestamp,
}

/// Payload of `room_joined`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomJoinedPayload {
    pub room: String,
}

/// Payload of `join_room`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JoinRoomPayload {
    Room { room: String },
    User { user_id: String },
}

/// Payload of `send_message`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessagePayload {
    pub order_id: String,
    pub message: String,
}
