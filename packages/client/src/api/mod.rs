//! Backend HTTP API seam.
//!
//! The sync client depends only on the [`HubApi`] trait; `HttpHubApi` is the
//! reqwest-backed implementation.

pub mod http;

use async_trait::async_trait;

use crate::{
    domain::{ChatMessage, Notification, ServiceSummary, ThreadId, TrendingService, UserId, UserStats},
    error::ApiError,
};

pub use http::HttpHubApi;

/// Read-only view of the marketplace backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HubApi: Send + Sync {
    /// Current notification list (`/api/notifications`)
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError>;

    /// Services matching `query` (`/api/search_services?q=`)
    async fn search_services(&self, query: &str) -> Result<Vec<ServiceSummary>, ApiError>;

    /// Services ranked by recent orders (`/api/trending_services`)
    async fn trending_services(&self) -> Result<Vec<TrendingService>, ApiError>;

    /// Statistics of one user (`/api/user_stats/:id`)
    async fn user_stats(&self, user_id: &UserId) -> Result<UserStats, ApiError>;

    /// Chat history of one thread (`/api/chat/:id`), oldest first
    async fn chat_history(&self, thread_id: &ThreadId) -> Result<Vec<ChatMessage>, ApiError>;
}
