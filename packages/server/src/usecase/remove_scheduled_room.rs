//! UseCase: 予定ルーム削除処理

use std::sync::Arc;

use crate::domain::{ScheduledRoom, ScheduledRoomId, ScheduledRoomRepository};

/// 予定ルーム削除のユースケース
pub struct RemoveScheduledRoomUseCase {
    scheduled_rooms: Arc<ScheduledRoomRepository>,
}

impl RemoveScheduledRoomUseCase {
    /// 新しい RemoveScheduledRoomUseCase を作成
    pub fn new(scheduled_rooms: Arc<ScheduledRoomRepository>) -> Self {
        Self { scheduled_rooms }
    }

    /// 予定ルームを削除
    ///
    /// 不明な ID は何もせず `None` を返す（配信も行わない）。
    pub async fn execute(&self, id: &str) -> Option<ScheduledRoom> {
        let id = ScheduledRoomId::parse(id)
            .inspect_err(|e| tracing::debug!("Ignoring scheduled room removal: {}", e))
            .ok()?;

        let removed = self.scheduled_rooms.remove(&id).await;
        match &removed {
            Some(scheduled) => tracing::info!("Scheduled room '{}' removed", scheduled.name),
            None => tracing::debug!("Scheduled room {} not found, nothing removed", id),
        }
        removed
    }
}
