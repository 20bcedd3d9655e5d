//! Redis-backed [`CounterStore`].

use async_trait::async_trait;
use fred::{prelude::*, types::SetOptions};

use crate::domain::{CounterStore, StoreError};

/// Subtract `ARGV[1]` from `KEYS[1]`, flooring at zero, in one atomic step.
///
/// A missing key counts as zero; a non-integer value is reported as an error
/// rather than overwritten.
const CLAMPED_DECREMENT_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
local current = 0
if raw then
  current = tonumber(raw)
  if current == nil then
    return redis.error_reply('ERR value is not an integer')
  end
end
local next = current - tonumber(ARGV[1])
if next < 0 then
  next = 0
end
redis.call('SET', KEYS[1], next)
return next
"#;

#[derive(Clone)]
pub struct RedisCounterStore {
    client: Client,
}

impl RedisCounterStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn to_store_error(err: fred::error::Error, key: &str) -> StoreError {
    if *err.kind() == ErrorKind::Parse || err.details().contains("not an integer") {
        StoreError::Corrupted {
            key: key.to_string(),
        }
    } else {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn init_if_absent(&self, key: &str) -> Result<bool, StoreError> {
        // SET NX replies OK when it wrote and nil when the key already existed.
        let reply: Option<String> = self
            .client
            .set(key, 0_i64, None, Some(SetOptions::NX), false)
            .await
            .map_err(|e| to_store_error(e, key))?;
        Ok(reply.is_some())
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        self.client
            .incr(key)
            .await
            .map_err(|e| to_store_error(e, key))
    }

    async fn decrement_clamped(&self, key: &str, amount: u64) -> Result<i64, StoreError> {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        self.client
            .eval(CLAMPED_DECREMENT_SCRIPT, key, amount)
            .await
            .map_err(|e| to_store_error(e, key))
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.client
            .get(key)
            .await
            .map_err(|e| to_store_error(e, key))
    }
}
