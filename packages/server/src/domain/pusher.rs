//! MessagePusher trait 定義
//!
//! ローカルに接続しているクライアントへのメッセージ送信（fan-out）の
//! インターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::SessionId;

/// クライアントへのメッセージ送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, session_id: SessionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, session_id: &SessionId);

    /// 指定したクライアントにブロードキャストし、送信できた数を返す
    ///
    /// 一部のクライアントへの送信失敗は許容する（ログのみ）。
    async fn broadcast(&self, targets: Vec<SessionId>, content: &str) -> usize;

    /// 全クライアントの登録を解除し、解除した数を返す
    ///
    /// 送信チャンネルが破棄されるため、各クライアントの送信ループは終了する。
    async fn unregister_all(&self) -> usize;
}
