//! UseCase: インスタンス状態の取得

use std::sync::Arc;

use crate::domain::{InstanceId, Lifecycle, LifecycleState, SessionRepository};

/// インスタンスの現在の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceStatus {
    pub instance_id: InstanceId,
    pub state: LifecycleState,
    pub local_connections: usize,
}

/// インスタンス状態取得のユースケース
pub struct GetInstanceStatusUseCase {
    repository: Arc<dyn SessionRepository>,
    lifecycle: Arc<Lifecycle>,
    instance_id: InstanceId,
}

impl GetInstanceStatusUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        lifecycle: Arc<Lifecycle>,
        instance_id: InstanceId,
    ) -> Self {
        Self {
            repository,
            lifecycle,
            instance_id,
        }
    }

    pub async fn execute(&self) -> InstanceStatus {
        InstanceStatus {
            instance_id: self.instance_id.clone(),
            state: self.lifecycle.state(),
            local_connections: self.repository.count_sessions().await,
        }
    }
}
