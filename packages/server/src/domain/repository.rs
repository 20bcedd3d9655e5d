//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{RegistryError, SessionId};

/// Session Repository trait
///
/// このインスタンスに接続しているセッション（ConnectionRegistry）への
/// インターフェース。UseCase 層はこの trait に依存する。
///
/// ## 不変条件
///
/// - `remove_session` はメンバーシップが実際に変化した場合のみ `true` を返す
/// - `close` 以降、`add_session` は `RegistryError::Closed` を返す
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを追加
    async fn add_session(&self, session_id: SessionId) -> Result<(), RegistryError>;

    /// セッションを削除（削除された場合 true）
    async fn remove_session(&self, session_id: &SessionId) -> bool;

    /// 接続中の全てのセッション ID を取得
    async fn session_ids(&self) -> Vec<SessionId>;

    /// 接続中のセッション数を取得
    async fn count_sessions(&self) -> usize;

    /// 新規セッションの受付を停止し、残っていたセッションを返す
    async fn close(&self) -> Vec<SessionId>;
}
