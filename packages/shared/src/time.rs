//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps are UTC Unix milliseconds. Wire representations use
//! ISO-8601 / RFC 3339 with millisecond precision and a `Z` suffix.

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_utc_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to an ISO-8601 string, e.g.
/// `2023-01-01T00:00:00.000Z`.
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_iso8601(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 / RFC 3339 string back into Unix milliseconds.
pub fn iso8601_to_timestamp(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis())
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
    fn test_fixed_clock_returns_consistent_timestamp() {
        // テスト項目: FixedClock が複数回呼び出しても同じタイムスタンプを返す
        // given (前提条件):
        let fixed_time = 9876543210987;
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let timestamp1 = clock.now_millis();
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert_eq!(timestamp1, fixed_time);
        assert_eq!(timestamp2, fixed_time);
    }

    #[test]
    fn test_timestamp_to_iso8601_format() {
        // テスト項目: タイムスタンプが ISO-8601 (UTC, ミリ秒) 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00.123 UTC
        let timestamp = 1672531200123;

        // when (操作):
        let result = timestamp_to_iso8601(timestamp);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_iso8601_to_timestamp_accepts_offsets() {
        // テスト項目: オフセット付き RFC 3339 文字列も UTC ミリ秒に変換される
        // given (前提条件):
        let value = "2023-01-01T09:00:00.123+09:00";

        // when (操作):
        let result = iso8601_to_timestamp(value);

        // then (期待する結果):
        assert_eq!(result, Some(1672531200123));
    }

    #[test]
    fn test_iso8601_to_timestamp_rejects_garbage() {
        // テスト項目: 不正な文字列は None になる
        // given (前提条件):
        let value = "yesterday";

        // when (操作):
        let result = iso8601_to_timestamp(value);

        // then (期待する結果):
        assert_eq!(result, None);
    }
}
