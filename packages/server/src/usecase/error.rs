//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{BusError, StoreError, ValueObjectError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("instance is draining and no longer accepts connections")]
    Draining,

    #[error("session '{0}' is already connected")]
    DuplicateSession(String),
}

/// 切断処理のエラー
#[derive(Debug, Error)]
pub enum DisconnectError {
    /// レジストリに存在しない（シャットダウン時に回収済みの場合を含む）
    #[error("session '{0}' is not connected")]
    NotConnected(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

/// メッセージ投稿のエラー
#[derive(Debug, Error)]
pub enum SubmitMessageError {
    #[error("invalid message: {0}")]
    Invalid(#[from] ValueObjectError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

/// バスから届いたイベントの中継エラー
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// シャットダウン時のカウンタ補正のエラー
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("shutdown already in progress")]
    NotRunning,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("counter correction did not finish within {grace_ms} ms")]
    TimedOut { grace_ms: u128 },
}
