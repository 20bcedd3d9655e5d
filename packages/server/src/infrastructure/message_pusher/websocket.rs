//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - ローカルクライアントへのメッセージ送信（broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの投入のみで、ソケットへの書き込みは各セッションの
//! pusher ループが行うため、fan-out がブロックすることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePusher, PusherChannel, SessionId};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.register_client(session_id, tx).await;
/// pusher.broadcast(vec![session_id], "{\"event\":\"new-message\",...}").await;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<SessionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(session_id, sender);
        tracing::debug!("Session '{}' registered to MessagePusher", session_id);
    }

    async fn unregister_client(&self, session_id: &SessionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(session_id);
        tracing::debug!("Session '{}' unregistered from MessagePusher", session_id);
    }

    async fn broadcast(&self, targets: Vec<SessionId>, content: &str) -> usize {
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            // A session sits in the registry briefly before and after it is known here
            let Some(sender) = clients.get(&target) else {
                tracing::debug!("Session '{}' not found during broadcast, skipping", target);
                continue;
            };
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!("Failed to push message to session '{}': {}", target, e);
            } else {
                delivered += 1;
            }
        }

        delivered
    }

    async fn unregister_all(&self) -> usize {
        let mut clients = self.clients.lock().await;
        let count = clients.len();
        clients.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionIdFactory;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - broadcast: 複数セッションへの送信と部分失敗の許容
    // - unregister_all: シャットダウン時に全ての送信チャンネルが閉じること
    // ========================================

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のセッションにメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = SessionIdFactory::generate();
        let bob = SessionIdFactory::generate();
        pusher.register_client(alice, tx1).await;
        pusher.register_client(bob, tx2).await;

        // when (操作):
        let delivered = pusher.broadcast(vec![alice, bob], "Broadcast message").await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 未登録・受信側切断済みのセッションがあっても他には届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let alice = SessionIdFactory::generate();
        let closed = SessionIdFactory::generate();
        let unknown = SessionIdFactory::generate();
        pusher.register_client(alice, tx1).await;
        pusher.register_client(closed, tx2).await;
        drop(rx2);

        // when (操作):
        let delivered = pusher.broadcast(vec![alice, closed, unknown], "hi").await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(rx1.recv().await, Some("hi".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_all_closes_channels() {
        // テスト項目: unregister_all で全ての送信チャンネルが閉じる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(SessionIdFactory::generate(), tx).await;

        // when (操作):
        let count = pusher.unregister_all().await;

        // then (期待する結果):
        assert_eq!(count, 1);
        assert_eq!(rx.recv().await, None);
    }
}
