//! Domain entities delivered by the backend.

/// Category of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Order,
    Activity,
    Other(String),
}

impl NotificationKind {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "info" | "" => NotificationKind::Info,
            "order" => NotificationKind::Order,
            "activity" => NotificationKind::Activity,
            other => NotificationKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Order => "order",
            NotificationKind::Activity => "activity",
            NotificationKind::Other(other) => other,
        }
    }
}

/// A transient notification, rendered once and never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// One chat message of an order thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user_id: String,
    pub username: String,
    pub message: String,
    /// Unix timestamp (milliseconds)
    pub timestamp_ms: i64,
}

/// Search hit for a service listing
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSummary {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub freelancer: String,
}

/// Service listing ranked by recent orders
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingService {
    pub service: ServiceSummary,
    pub order_count: u64,
}

/// Per-user statistics; the variant depends on the account type
#[derive(Debug, Clone, PartialEq)]
pub enum UserStats {
    Freelancer {
        services_count: u64,
        orders_received: u64,
        completed_orders: u64,
        total_earnings: f64,
        /// Percentage in `0.0..=100.0`
        completion_rate: f64,
    },
    Client {
        orders_placed: u64,
        completed_orders: u64,
        total_spent: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_from_wire() {
        // テスト項目: 通知種別の文字列が対応する種別に変換される
        // given (前提条件):
        let values = ["order", "info", "activity", "", "payment"];

        // when (操作):
        let kinds: Vec<NotificationKind> =
            values.iter().map(|v| NotificationKind::from_wire(v)).collect();

        // then (期待する結果):
        assert_eq!(kinds[0], NotificationKind::Order);
        assert_eq!(kinds[1], NotificationKind::Info);
        assert_eq!(kinds[2], NotificationKind::Activity);
        assert_eq!(kinds[3], NotificationKind::Info);
        assert_eq!(kinds[4], NotificationKind::Other("payment".to_string()));
        assert_eq!(kinds[4].as_str(), "payment");
    }
}
