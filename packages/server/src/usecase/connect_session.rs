//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - 接続の登録と、接続したクライアントだけへの初期一覧（ステッカー・予定ルーム）の送信
//!
//! ### なぜこのテストが必要か
//! - 新しい接続は全体配信の対象になる必要がある
//! - 初期一覧は他のクライアントに配信してはいけない
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続すると Connected 状態のセッションが作られ、一覧が 2 つ届く
//! - エッジケース：他の接続には何も届かない

use std::sync::Arc;

use crate::domain::{
    ConnectionRepository, EventSender, ScheduledRoomRepository, Session, SessionIdFactory,
    StickerRepository, Timestamp,
};

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    connections: Arc<dyn ConnectionRepository>,
    stickers: Arc<StickerRepository>,
    scheduled_rooms: Arc<ScheduledRoomRepository>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        stickers: Arc<StickerRepository>,
        scheduled_rooms: Arc<ScheduledRoomRepository>,
    ) -> Self {
        Self {
            connections,
            stickers,
            scheduled_rooms,
        }
    }

    /// 接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続の送信キュー
    ///
    /// # Returns
    ///
    /// `Connected` 状態の新しいセッション
    pub async fn execute(&self, sender: EventSender) -> Session {
        let session = Session::new(SessionIdFactory::generate(), Timestamp::now());

        // 1. 全体配信の対象として登録
        self.connections
            .register(session.id(), sender, session.connected_at())
            .await;

        // 2. 現在の一覧をこの接続にだけ送る
        self.stickers.send_current(&session.id()).await;
        self.scheduled_rooms.send_current(&session.id()).await;

        tracing::info!("Session {} connected", session.id());
        session
    }
}
