//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! `ConnectionRegistry` ドメインモデルをそのままストレージとして使用します。
//! レジストリはインスタンス毎に独立しており、他のインスタンスとは共有しません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionRegistry, RegistryError, SessionId, SessionRepository};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// ConnectionRegistry ドメインモデル
    registry: Arc<Mutex<ConnectionRegistry>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(registry: Arc<Mutex<ConnectionRegistry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(ConnectionRegistry::new())))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn add_session(&self, session_id: SessionId) -> Result<(), RegistryError> {
        let mut registry = self.registry.lock().await;
        registry.add(session_id)
    }

    async fn remove_session(&self, session_id: &SessionId) -> bool {
        let mut registry = self.registry.lock().await;
        registry.remove(session_id)
    }

    async fn session_ids(&self) -> Vec<SessionId> {
        let registry = self.registry.lock().await;
        registry.session_ids()
    }

    async fn count_sessions(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }

    async fn close(&self) -> Vec<SessionId> {
        let mut registry = self.registry.lock().await;
        registry.close()
    }
}
