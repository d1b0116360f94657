//! UseCase: 予定ルーム公開処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PublishScheduledRoomUseCase::execute() メソッド
//! - 入力の検証と、予定ルーム一覧への追加・全体配信
//!
//! ### なぜこのテストが必要か
//! - 空のルーム名・時刻の予定が一覧に載らないことを保証
//! - 公開した予定は全クライアントに届く必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：公開すると一覧全体が配信される
//! - 異常系：ルーム名・時刻の欠落

use std::sync::Arc;

use crate::domain::{
    RoomName, ScheduledRoom, ScheduledRoomIdFactory, ScheduledRoomRepository, ScheduledTime,
};

use super::error::PublishScheduledRoomError;

/// 予定ルーム公開のユースケース
pub struct PublishScheduledRoomUseCase {
    scheduled_rooms: Arc<ScheduledRoomRepository>,
}

impl PublishScheduledRoomUseCase {
    /// 新しい PublishScheduledRoomUseCase を作成
    pub fn new(scheduled_rooms: Arc<ScheduledRoomRepository>) -> Self {
        Self { scheduled_rooms }
    }

    /// 予定ルームを公開
    ///
    /// 時刻は不透明な文字列として扱い、解釈しない。
    pub async fn execute(
        &self,
        room: String,
        time: String,
    ) -> Result<ScheduledRoom, PublishScheduledRoomError> {
        let name = RoomName::new(room)?;
        let time = ScheduledTime::new(time)?;

        let scheduled = ScheduledRoom::new(ScheduledRoomIdFactory::generate(), name, time);
        let list = self.scheduled_rooms.add(scheduled.clone()).await;

        tracing::info!(
            "Scheduled room '{}' published for '{}' ({} scheduled)",
            scheduled.name,
            scheduled.time.as_str(),
            list.len()
        );
        Ok(scheduled)
    }
}
