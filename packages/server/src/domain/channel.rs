//! Bus channel names and the counter key.
//!
//! These names are the interoperability contract between instances: every
//! instance must publish and subscribe with exactly these strings.

use std::fmt;

/// Key of the shared connection counter in the counter store.
pub const CONNECTION_COUNT_KEY: &str = "chat:connection-count";

/// A publish/subscribe channel on the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusChannel {
    /// Carries the new connection total as a decimal string.
    ConnectionCountUpdated,
    /// Carries raw chat text as submitted by a client.
    NewMessage,
}

impl BusChannel {
    /// Every channel an instance subscribes to at startup.
    pub const ALL: [BusChannel; 2] = [BusChannel::ConnectionCountUpdated, BusChannel::NewMessage];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusChannel::ConnectionCountUpdated => "chat:connection-count-updated",
            BusChannel::NewMessage => "chat:new-message",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == name)
    }
}

impl fmt::Display for BusChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message received from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusDelivery {
    pub channel: BusChannel,
    pub payload: String,
}

impl BusDelivery {
    pub fn new(channel: BusChannel, payload: impl Into<String>) -> Self {
        Self {
            channel,
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_round_trip() {
        // テスト項目: チャンネル名から BusChannel を復元できる
        // given (前提条件):

        for channel in BusChannel::ALL {
            // when (操作):
            let parsed = BusChannel::from_name(channel.as_str());

            // then (期待する結果):
            assert_eq!(parsed, Some(channel));
        }
    }

    #[test]
    fn test_unknown_channel_name() {
        // テスト項目: 未知のチャンネル名は None になる
        // given (前提条件):
        let name = "chat:room:42";

        // when (操作):
        let parsed = BusChannel::from_name(name);

        // then (期待する結果):
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_names_are_distinct_from_counter_key() {
        // テスト項目: カウンタキーとチャンネル名が衝突しない
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert!(
            BusChannel::ALL
                .iter()
                .all(|channel| channel.as_str() != CONNECTION_COUNT_KEY)
        );
    }
}
