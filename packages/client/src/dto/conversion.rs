//! Conversion logic between DTOs and domain entities.

use hubsync_shared::time::parse_timestamp_millis;

use crate::{
    domain::{
        ChatMessage, Notification, NotificationKind, Room, ServiceSummary, TrendingService,
        UserStats,
    },
    error::TransportError,
    transport::{InboundEvent, OutboundEvent},
};

use super::{
    http::{ServiceDto, TrendingServiceDto, UserStatsDto},
    realtime::{
        self as wire, ChatMessagePayload, Frame, JoinRoomPayload, NotificationPayload,
        RoomJoinedPayload, SendMessagePayload, WireTimestamp,
    },
};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<NotificationPayload> for Notification {
    fn from(dto: NotificationPayload) -> Self {
        Self {
            message: dto.message,
            kind: NotificationKind::from_wire(&dto.kind),
        }
    }
}

impl TryFrom<ChatMessagePayload> for ChatMessage {
    type Error = String;

    fn try_from(dto: ChatMessagePayload) -> Result<Self, Self::Error> {
        let timestamp_ms = match dto.timestamp {
            WireTimestamp::Millis(millis) => millis,
            WireTimestamp::Text(text) => parse_timestamp_millis(&text)
                .ok_or_else(|| format!("invalid timestamp '{}'", text))?,
        };

        Ok(Self {
            user_id: dto.user_id.into_string(),
            username: dto.username,
            message: dto.message,
            timestamp_ms,
        })
    }
}

impl From<ServiceDto> for ServiceSummary {
    fn from(dto: ServiceDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            price: dto.price,
            freelancer: dto.freelancer,
        }
    }
}

impl From<TrendingServiceDto> for TrendingService {
    fn from(dto: TrendingServiceDto) -> Self {
        Self {
            service: dto.service.into(),
            order_count: dto.order_count,
        }
    }
}

impl From<UserStatsDto> for UserStats {
    fn from(dto: UserStatsDto) -> Self {
        match dto {
            UserStatsDto::Freelancer(stats) => UserStats::Freelancer {
                services_count: stats.services_count,
                orders_received: stats.orders_received,
                completed_orders: stats.completed_orders,
                total_earnings: stats.total_earnings,
                completion_rate: stats.completion_rate,
            },
            UserStatsDto::Client(stats) => UserStats::Client {
                orders_placed: stats.orders_placed,
                completed_orders: stats.completed_orders,
                total_spent: stats.total_spent,
            },
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Room> for JoinRoomPayload {
    fn from(room: &Room) -> Self {
        match room {
            Room::User(user_id) => JoinRoomPayload::User {
                user_id: user_id.as_str().to_string(),
            },
            Room::Named(name) => JoinRoomPayload::Room { room: name.clone() },
        }
    }
}

// ========================================
// Frame codec
// ========================================

fn payload<T: serde::de::DeserializeOwned>(frame: Frame) -> Result<T, TransportError> {
    serde_json::from_value(frame.data)
        .map_err(|e| TransportError::Decode(format!("'{}' payload: {}", frame.event, e)))
}

/// Decode one inbound text frame into a typed event
pub fn decode_inbound(text: &str) -> Result<InboundEvent, TransportError> {
    let frame: Frame =
        serde_json::from_str(text).map_err(|e| TransportError::Decode(e.to_string()))?;

    match frame.event.as_str() {
        wire::EVENT_NOTIFICATION => {
            let dto: NotificationPayload = payload(frame)?;
            Ok(InboundEvent::Notification(dto.into()))
        }
        wire::EVENT_NEW_MESSAGE => {
            let dto: ChatMessagePayload = payload(frame)?;
            let message = ChatMessage::try_from(dto).map_err(TransportError::Decode)?;
            Ok(InboundEvent::NewMessage(message))
        }
        wire::EVENT_ROOM_JOINED => {
            let dto: RoomJoinedPayload = payload(frame)?;
            Ok(InboundEvent::RoomJoined { room: dto.room })
        }
        _ => Ok(InboundEvent::Unknown { event: frame.event }),
    }
}

/// Encode one outbound event into a text frame
pub fn encode_outbound(event: &OutboundEvent) -> Result<String, TransportError> {
    let frame = match event {
        OutboundEvent::JoinRoom(room) => Frame {
            event: wire::EVENT_JOIN_ROOM.to_string(),
            data: serde_json::to_value(JoinRoomPayload::from(room))?,
        },
        OutboundEvent::SendMessage { thread_id, message } => Frame {
            event: wire::EVENT_SEND_MESSAGE.to_string(),
            data: serde_json::to_value(SendMessagePayload {
                order_id: thread_id.as_str().to_string(),
                message: message.clone(),
            })?,
        },
    };

    Ok(serde_json::to_string(&frame)?)
}
