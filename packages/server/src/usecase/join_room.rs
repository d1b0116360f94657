//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 入力の検証、セッションの状態遷移（Connected → InRoom）、Room への追加
//!
//! ### なぜこのテストが必要か
//! - ルーム名・表示名の欠落は拒否する必要がある
//! - 参加中のセッションが別のルームに参加すると元のルームの人数がずれるため、2 回目の参加は拒否する
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加すると履歴と人数が返り、セッションが InRoom になる
//! - 異常系：空のルーム名・表示名
//! - 異常系：参加済みセッションの 2 回目の参加

use std::sync::Arc;

use crate::domain::{
    DisplayName, EventSender, JoinOutcome, Member, RoomName, RoomRepository, Session, Timestamp,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    rooms: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 参加するセッション
    /// * `sender` - セッションの送信キュー（ルーム内の配信に使う）
    /// * `room` - ルーム名（クライアント入力）
    /// * `name` - 表示名（クライアント入力）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 参加前の履歴と参加後の人数
    /// * `Err(JoinRoomError)` - 入力不正、または参加済み
    pub async fn execute(
        &self,
        session: &mut Session,
        sender: EventSender,
        room: String,
        name: String,
    ) -> Result<JoinOutcome, JoinRoomError> {
        // 1. 状態と入力の検証（何も変更しない）
        session.ensure_can_join()?;
        let room = RoomName::new(room)?;
        let name = DisplayName::new(name)?;

        // 2. セッションの状態遷移
        // Room への追加より先に行う。途中で中断されても切断処理が退出を試みる。
        session.joined(room.clone(), name.clone())?;

        // 3. Room に参加（履歴送信・参加通知・人数配信は Room 内で行われる）
        let member = Member::new(session.id(), name.clone(), Timestamp::now(), sender);
        let outcome = self.rooms.join(room.clone(), member).await;

        tracing::info!(
            "Session {} joined room '{}' as '{}' ({} users)",
            session.id(),
            room,
            name,
            outcome.user_count
        );
        Ok(outcome)
    }
}
