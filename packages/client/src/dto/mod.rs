//! Data Transfer Objects (DTOs) for the backend interfaces.
//!
//! DTOs are organized by protocol:
//! - `realtime`: WebSocket event frames and payloads
//! - `http`: HTTP API response bodies

pub mod conversion;
pub mod http;
pub mod realtime;
