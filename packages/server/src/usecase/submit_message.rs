//! UseCase: メッセージ投稿処理
//!
//! 検証済みのテキストをそのまま（エンベロープも送信者情報も付けずに）
//! メッセージチャンネルへ publish します。ID と時刻の付与は配送時に
//! 受信側の各インスタンスが行います。

use std::sync::Arc;

use crate::domain::{BusChannel, EventBus, MessageText};

use super::error::SubmitMessageError;

/// メッセージ投稿のユースケース
pub struct SubmitMessageUseCase {
    event_bus: Arc<dyn EventBus>,
}

impl SubmitMessageUseCase {
    pub fn new(event_bus: Arc<dyn EventBus>) -> Self {
        Self { event_bus }
    }

    /// メッセージ投稿を実行
    ///
    /// # Returns
    ///
    /// * `Ok(MessageText)` - publish したテキスト
    /// * `Err(SubmitMessageError::Invalid)` - 空白のみ・長すぎるテキスト（何も publish しない）
    /// * `Err(SubmitMessageError::Bus)` - publish の失敗
    pub async fn execute(&self, raw: String) -> Result<MessageText, SubmitMessageError> {
        let text = MessageText::new(raw)?;
        self.event_bus
            .publish(BusChannel::NewMessage, text.as_str())
            .await?;
        Ok(text)
    }
}
