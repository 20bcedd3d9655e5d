//! Redis client construction shared by the Redis-backed adapters.
//!
//! The counter store and the event bus publisher can share one connection.
//! The subscriber needs its own: a RESP2 connection in subscribe mode cannot
//! issue regular commands.

use std::time::Duration;

use fred::{clients::SubscriberClient, prelude::*};
use thiserror::Error;

/// Errors that can occur while connecting to Redis at startup.
#[derive(Debug, Error)]
pub enum RedisSetupError {
    #[error("invalid Redis URL: {0}")]
    InvalidUrl(String),

    #[error("Redis connection failed: {0}")]
    Connect(#[from] fred::error::Error),
}

/// Builder with the reconnect policy and command timeout every connection uses.
///
/// Dropped connections are retried with exponential backoff (100 ms up to
/// 30 s) for as long as the process runs. Commands queued while a reconnect is
/// pending fail with a timeout error once `command_timeout` elapses.
fn builder(url: &str, command_timeout: Duration) -> Result<Builder, RedisSetupError> {
    let config = Config::from_url(url).map_err(|e| RedisSetupError::InvalidUrl(e.to_string()))?;

    let mut builder = Builder::from_config(config);
    builder
        .set_policy(ReconnectPolicy::new_exponential(0, 100, 30_000, 2))
        .with_performance_config(|performance| {
            performance.default_command_timeout = command_timeout;
        });
    Ok(builder)
}

/// Connect to Redis at the given URL (`redis://host:port` or `rediss://…`).
///
/// Used for counter commands and publishing.
pub async fn connect_redis(url: &str, command_timeout: Duration) -> Result<Client, RedisSetupError> {
    let client = builder(url, command_timeout)?.build()?;
    client.init().await?;

    tracing::info!("Connected to Redis");
    Ok(client)
}

/// Connect the dedicated pub/sub connection.
///
/// Channels subscribed through the returned client are subscribed again after
/// every reconnect.
pub async fn connect_redis_subscriber(
    url: &str,
    command_timeout: Duration,
) -> Result<SubscriberClient, RedisSetupError> {
    let subscriber = builder(url, command_timeout)?.build_subscriber_client()?;
    subscriber.init().await?;
    subscriber.manage_subscriptions();

    tracing::info!("Connected to Redis (subscriber)");
    Ok(subscriber)
}

#[cfg(test)]
pub(crate) mod stub;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_invalid_url() {
        // テスト項目: 不正な URL は接続前にエラーになる
        // given (前提条件):
        let url = "not-a-redis-url";

        // when (操作):
        let result = builder(url, Duration::from_secs(1));

        // then (期待する結果):
        assert!(matches!(result, Err(RedisSetupError::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_applies_command_timeout() {
        // テスト項目: コマンドのタイムアウトが設定に反映される
        // given (前提条件):
        let timeout = Duration::from_millis(750);

        // when (操作):
        let builder = builder("redis://127.0.0.1:6379", timeout).unwrap();

        // then (期待する結果):
        assert_eq!(builder.get_performance_config().default_command_timeout, timeout);
        assert!(builder.get_policy().is_some());
    }
}
