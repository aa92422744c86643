//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::realtime::ChatMessagePayload;

/// Item of `/api/search_services`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceDto {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub freelancer: String,
}

/// Item of `/api/trending_services`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingServiceDto {
    #[serde(flatten)]
    pub service: ServiceDto,
    pub order_count: u64,
}

/// Body of `/api/user_stats/:id`.
///
/// `services_count` is only present for freelancers, so it decides the variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UserStatsDto {
    Freelancer(FreelancerStatsDto),
    Client(ClientStatsDto),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreelancerStatsDto {
    pub services_count: u64,
    #[serde(default)]
    pub orders_received: u64,
    #[serde(default)]
    pub completed_orders: u64,
    #[serde(default)]
    pub total_earnings: f64,
    #[serde(default)]
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientStatsDto {
    #[serde(default)]
    pub orders_placed: u64,
    #[serde(default)]
    pub completed_orders: u64,
    #[serde(default)]
    pub total_spent: f64,
}

/// Body of `/api/chat/:thread_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatHistoryDto {
    #[serde(default)]
    pub messages: Vec<ChatMessagePayload>,
}
