//! reqwest implementation of [`HubApi`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    domain::{
        ChatMessage, Notification, ServiceSummary, ThreadId, TrendingService, UserId, UserStats,
    },
    dto::{
        http::{ChatHistoryDto, ServiceDto, TrendingServiceDto, UserStatsDto},
        realtime::NotificationPayload,
    },
    error::ApiError,
};

use super::HubApi;

/// HTTP client for the marketplace backend
#[derive(Debug, Clone)]
pub struct HttpHubApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpHubApi {
    /// Create a client for the backend at `base_url` (e.g. `http://127.0.0.1:5000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl HubApi for HttpHubApi {
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let items: Vec<NotificationPayload> = self.get_json("/api/notifications", &[]).await?;
        Ok(items.into_iter().map(Notification::from).collect())
    }

    async fn search_services(&self, query: &str) -> Result<Vec<ServiceSummary>, ApiError> {
        let items: Vec<ServiceDto> = self
            .get_json("/api/search_services", &[("q", query)])
            .await?;
        Ok(items.into_iter().map(ServiceSummary::from).collect())
    }

    async fn trending_services(&self) -> Result<Vec<TrendingService>, ApiError> {
        let items: Vec<TrendingServiceDto> = self.get_json("/api/trending_services", &[]).await?;
        Ok(items.into_iter().map(TrendingService::from).collect())
    }

    async fn user_stats(&self, user_id: &UserId) -> Result<UserStats, ApiError> {
        let path = format!("/api/user_stats/{}", user_id.as_str());
        let stats: UserStatsDto = self.get_json(&path, &[]).await?;
        Ok(stats.into())
    }

    async fn chat_history(&self, thread_id: &ThreadId) -> Result<Vec<ChatMessage>, ApiError> {
        let path = format!("/api/chat/{}", thread_id.as_str());
        let history: ChatHistoryDto = self.get_json(&path, &[]).await?;

        history
            .messages
            .into_iter()
            .map(ChatMessage::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| ApiError::Decode {
                endpoint: path.clone(),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() {
        // テスト項目: ベース URL 末尾のスラッシュが重複しない
        // given (前提条件):
        let api = HttpHubApi::new("http://127.0.0.1:5000/");

        // when (操作):
        let url = api.url("/api/notifications");

        // then (期待する結果):
        assert_eq!(url, "http://127.0.0.1:5000/api/notifications");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        // テスト項目: 接続できないバックエンドへのリクエストは Request エラーになる
        // given (前提条件):
        let api = HttpHubApi::new("http://127.0.0.1:1");

        // when (操作):
        let result = api.notifications().await;

        // then (期待する結果):
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
