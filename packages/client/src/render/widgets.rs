//! Search results, trending board and user stats panels.

use crate::domain::{ServiceSummary, TrendingService, UserStats};

pub const NO_SERVICES_NOTICE: &str = "No services found";
pub const NO_TRENDING_NOTICE: &str = "No trending services yet";

/// Format a dollar amount with two decimals
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format a percentage with one decimal
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// Live search dropdown
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPanel {
    Hidden,
    Empty { query: String },
    Results {
        query: String,
        services: Vec<ServiceSummary>,
    },
}

impl SearchPanel {
    pub fn from_results(query: &str, services: Vec<ServiceSummary>) -> Self {
        if services.is_empty() {
            SearchPanel::Empty {
                query: query.to_string(),
            }
        } else {
            SearchPanel::Results {
                query: query.to_string(),
                services,
            }
        }
    }
}

/// One card of the trending board
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingCard {
    pub service_id: u64,
    pub title: String,
    pub byline: String,
    pub price: String,
    pub orders: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingBoard {
    pub cards: Vec<TrendingCard>,
}

impl TrendingBoard {
    pub fn from_services(services: Vec<TrendingService>) -> Self {
        let cards = services
            .into_iter()
            .map(|trending| TrendingCard {
                service_id: trending.service.id,
                byline: format!("by {}", trending.service.freelancer),
                price: format_money(trending.service.price),
                orders: format!("{} orders", trending.order_count),
                title: trending.service.title,
            })
            .collect();
        Self { cards }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// One labelled figure of the stats panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    pub tiles: Vec<StatTile>,
}

impl StatsPanel {
    pub fn from_stats(stats: &UserStats) -> Self {
        let tiles = match stats {
            UserStats::Freelancer {
                services_count,
                completed_orders,
                total_earnings,
                completion_rate,
                ..
            } => vec![
                tile("Active Services", services_count.to_string()),
                tile("Total Earnings", format_money(*total_earnings)),
                tile("Completed Orders", completed_orders.to_string()),
                tile("Completion Rate", format_rate(*completion_rate)),
            ],
            UserStats::Client {
                orders_placed,
                total_spent,
                ..
            } => vec![
                tile("Orders Placed", orders_placed.to_string()),
                tile("Total Spent", format_money(*total_spent)),
            ],
        };
        Self { tiles }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.tiles
            .iter()
            .find(|tile| tile.label == label)
            .map(|tile| tile.value.as_str())
    }
}

fn tile(label: &'static str, value: String) -> StatTile {
    StatTile { label, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freelancer_stats_panel() {
        // テスト項目: フリーランサーの統計は 4 項目で、完了率は小数 1 桁になる
        // given (前提条件):
        let stats = UserStats::Freelancer {
            services_count: 3,
            orders_received: 3,
            completed_orders: 2,
            total_earnings: 150.5,
            completion_rate: 66.666,
        };

        // when (操作):
        let panel = StatsPanel::from_stats(&stats);

        // then (期待する結果):
        assert_eq!(panel.tiles.len(), 4);
        assert_eq!(panel.value("Completion Rate"), Some("66.7%"));
        assert_eq!(panel.value("Total Earnings"), Some("$150.50"));
        assert_eq!(panel.value("Active Services"), Some("3"));
    }

    #[test]
    fn test_client_stats_panel() {
        // テスト項目: クライアントの統計は注文数と支出額の 2 項目になる
        // given (前提条件):
        let stats = UserStats::Client {
            orders_placed: 4,
            completed_orders: 1,
            total_spent: 0.0,
        };

        // when (操作):
        let panel = StatsPanel::from_stats(&stats);

        // then (期待する結果):
        assert_eq!(panel.tiles.len(), 2);
        assert_eq!(panel.value("Orders Placed"), Some("4"));
        assert_eq!(panel.value("Total Spent"), Some("$0.00"));
        assert_eq!(panel.value("Completion Rate"), None);
    }

    #[test]
    fn test_search_panel_empty_results() {
        // テスト項目: 検索結果が空の場合は Empty パネルになる
        // given (前提条件):
        let services = vec![];

        // when (操作):
        let panel = SearchPanel::from_results("logo", services);

        // then (期待する結果):
        assert_eq!(
            panel,
            SearchPanel::Empty {
                query: "logo".to_string()
            }
        );
    }

    #[test]
    fn test_trending_board_cards() {
        // テスト項目: トレンドサービスがカードに変換される
        // given (前提条件):
        let services = vec![TrendingService {
            service: ServiceSummary {
                id: 9,
                title: "Logo design".to_string(),
                price: 25.0,
                freelancer: "bob".to_string(),
            },
            order_count: 4,
        }];

        // when (操作):
        let board = TrendingBoard::from_services(services);

        // then (期待する結果):
        assert_eq!(board.cards.len(), 1);
        let card = &board.cards[0];
        assert_eq!(card.byline, "by bob");
        assert_eq!(card.price, "$25.00");
        assert_eq!(card.orders, "4 orders");
    }
}
