//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    domain::Lifecycle,
    usecase::{
        ConnectSessionUseCase, DisconnectSessionUseCase, GetInstanceStatusUseCase,
        SubmitMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（セッション接続のユースケース）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（セッション切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// SubmitMessageUseCase（メッセージ投稿のユースケース）
    pub submit_message_usecase: Arc<SubmitMessageUseCase>,
    /// GetInstanceStatusUseCase（インスタンス状態取得のユースケース）
    pub get_instance_status_usecase: Arc<GetInstanceStatusUseCase>,
    pub lifecycle: Arc<Lifecycle>,
    /// Port the listener actually bound
    pub port: u16,
}
