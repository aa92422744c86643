//! Time-related utilities with clock abstraction for testability.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        current_timestamp_millis()
    }
}

/// Manually advanced clock for simulating elapsed time in tests.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and advance the clock seen by the component under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a manual clock starting at the given timestamp
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    /// Move the clock forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse an ISO-8601 timestamp into Unix milliseconds.
///
/// Accepts RFC 3339 values with an offset, and naive values such as
/// `2024-05-01T12:30:00.123456` which are taken as UTC.
pub fn parse_timestamp_millis(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Format a Unix timestamp (milliseconds) as local `HH:MM`
pub fn format_clock_time(timestamp_millis: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_manual_clock_advance_is_shared_between_clones() {
        // テスト項目: ManualClock のクローンは同じ時刻を共有する
        // given (前提条件):
        let clock = ManualClock::new(1_000);
        let observer = clock.clone();

        // when (操作):
        clock.advance(5_000);

        // then (期待する結果):
        assert_eq!(observer.now_millis(), 6_000);
    }

    #[test]
    fn test_parse_timestamp_millis_rfc3339() {
        // テスト項目: オフセット付き RFC 3339 形式が解析される
        // given (前提条件):
        let text = "2023-01-01T00:00:00+09:00";

        // when (操作):
        let result = parse_timestamp_millis(text);

        // then (期待する結果):
        assert_eq!(result, Some(1672498800000));
    }

    #[test]
    fn test_parse_timestamp_millis_naive_is_utc() {
        // テスト項目: オフセットなしの ISO 形式は UTC として解析される
        // given (前提条件):
        let text = "2022-12-31T15:00:00.250000";

        // when (操作):
        let result = parse_timestamp_millis(text);

        // then (期待する結果):
        assert_eq!(result, Some(1672498800250));
    }

    #[test]
    fn test_parse_timestamp_millis_rejects_garbage() {
        // テスト項目: 不正な文字列は None になる
        // given (前提条件):
        let text = "yesterday";

        // when (操作):
        let result = parse_timestamp_millis(text);

        // then (期待する結果):
        assert_eq!(result, None);
    }

    #[test]
    fn test_format_clock_time_shape() {
        // テスト項目: 時刻が HH:MM 形式で出力される
        // given (前提条件):
        let timestamp = 1672498800000;

        // when (操作):
        let result = format_clock_time(timestamp);

        // then (期待する結果):
        assert_eq!(result.len(), 5);
        assert_eq!(result.chars().nth(2), Some(':'));
    }
}
