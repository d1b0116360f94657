//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 切断時の退出処理（退出通知 → 人数配信）、最後の退出でのルーム破棄と添付ファイル削除
//!
//! ### なぜこのテストが必要か
//! - 残ったメンバーには退出通知の後に人数が届く必要がある
//! - 空のルームが残らず、添付ファイルの実体も削除されることを保証
//! - ルーム未参加のセッションの切断では何も起こらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーが残る切断
//! - エッジケース：最後のメンバーの切断（ルーム破棄・添付ファイル削除）
//! - エッジケース：ルーム未参加のまま切断

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{
    ConnectionRepository, LeaveOutcome, MediaStore, RoomRepository, Session, Timestamp,
};

use super::cleanup::spawn_media_cleanup;

/// 切断処理の結果
#[derive(Debug, Default)]
pub struct DisconnectOutcome {
    /// ルームに参加していた場合の退出結果
    pub left: Option<LeaveOutcome>,
    /// 破棄されたルームの添付ファイル削除タスク
    pub cleanup: Option<JoinHandle<()>>,
}

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    rooms: Arc<dyn RoomRepository>,
    connections: Arc<dyn ConnectionRepository>,
    /// 添付ファイルの保存先
    uploads: Arc<dyn MediaStore>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        connections: Arc<dyn ConnectionRepository>,
        uploads: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            rooms,
            connections,
            uploads,
        }
    }

    /// セッション切断を実行
    ///
    /// セッションは終端状態（Disconnected）になる。2 回呼んでも 2 回目は何もしない。
    pub async fn execute(&self, session: &mut Session) -> DisconnectOutcome {
        let session_id = session.id();

        // 1. 全体配信の対象から外す
        self.connections.unregister(&session_id).await;

        // 2. ルームに参加していれば退出
        let Some(room) = session.disconnect() else {
            tracing::info!("Session {} disconnected without joining a room", session_id);
            return DisconnectOutcome::default();
        };

        let outcome = match self.rooms.leave(&room, &session_id, Timestamp::now()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Failed to leave room '{}' for {}: {}", room, session_id, e);
                return DisconnectOutcome::default();
            }
        };
        tracing::info!(
            "Session {} left room '{}' ({} users remain)",
            session_id,
            room,
            outcome.user_count
        );

        // 3. ルームが破棄されたら添付ファイルを削除（切り離して実行）
        let cleanup = outcome.released_attachments.clone().map(|urls| {
            tracing::info!(
                "Room '{}' is empty, deleting {} attachments",
                room,
                urls.len()
            );
            spawn_media_cleanup(self.uploads.clone(), urls)
        });

        DisconnectOutcome {
            left: Some(outcome),
            cleanup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ChatMessage, DisplayName, EventReceiver, Member, RoomName, ServerEvent,
            SessionIdFactory, SessionState, media::MockMediaStore,
        },
        infrastructure::repository::{InMemoryConnectionRepository, InMemoryRoomRepository},
        usecase::{JoinRoomUseCase, SendMessageInput, SendMessageUseCase},
    };
    use mockall::predicate::eq;
    use tokio::sync::mpsc;

    struct Fixture {
        rooms: Arc<InMemoryRoomRepository>,
        connections: Arc<InMemoryConnectionRepository>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                rooms: Arc::new(InMemoryRoomRepository::new()),
                connections: Arc::new(InMemoryConnectionRepository::new()),
            }
        }

        async fn join(&self, name: &str) -> (Session, EventReceiver) {
            self.join_room("lobby", name).await
        }

        async fn join_room(&self, room: &str, name: &str) -> (Session, EventReceiver) {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut session = Session::new(SessionIdFactory::generate(), Timestamp::now());
            self.connections
                .register(session.id(), tx.clone(), session.connected_at())
                .await;
            JoinRoomUseCase::new(self.rooms.clone())
                .execute(&mut session, tx, room.to_string(), name.to_string())
                .await
                .unwrap();
            while rx.try_recv().is_ok() {}
            (session, rx)
        }

        fn usecase(&self, uploads: MockMediaStore) -> DisconnectSessionUseCase {
            DisconnectSessionUseCase::new(
                self.rooms.clone(),
                self.connections.clone(),
                Arc::new(uploads),
            )
        }
    }

    fn lobby() -> RoomName {
        RoomName::new("lobby".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members_in_order() {
        // テスト項目: 切断すると残りのメンバーに退出通知、続いて人数が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let (_alice, mut alice_rx) = fixture.join("Alice").await;
        let (mut bob, _bob_rx) = fixture.join("Bob").await;
        while alice_rx.try_recv().is_ok() {}
        let mut uploads = MockMediaStore::new();
        uploads.expect_delete().never();
        let usecase = fixture.usecase(uploads);

        // when (操作):
        let outcome = usecase.execute(&mut bob).await;

        // then (期待する結果):
        assert_eq!(outcome.left.as_ref().unwrap().user_count, 1);
        assert!(outcome.cleanup.is_none());
        match alice_rx.try_recv().unwrap() {
            ServerEvent::Message(ChatMessage::System { text, .. }) => {
                assert_eq!(text, "Bob left the room")
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(alice_rx.try_recv().unwrap(), ServerEvent::UserCount(1));
        assert_eq!(bob.state(), &SessionState::Disconnected);
        assert_eq!(fixture.connections.count().await, 1);
    }

    #[tokio::test]
    async fn test_last_disconnect_destroys_room_and_deletes_attachments() {
        // テスト項目: 最後のメンバーが切断するとルームが破棄され、添付ファイルが削除される
        // given (前提条件):
        let fixture = Fixture::new();
        let (mut alice, _alice_rx) = fixture.join("Alice").await;
        SendMessageUseCase::new(fixture.rooms.clone())
            .execute(
                &alice,
                SendMessageInput {
                    file_url: Some("/uploads/photo.png".to_string()),
                    media_type: Some("image".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let mut uploads = MockMediaStore::new();
        uploads
            .expect_delete()
            .with(eq("/uploads/photo.png"))
            .times(1)
            .returning(|_| Ok(()));
        let usecase = fixture.usecase(uploads);

        // when (操作):
        let outcome = usecase.execute(&mut alice).await;

        // then (期待する結果):
        assert_eq!(outcome.left.unwrap().user_count, 0);
        outcome.cleanup.unwrap().await.unwrap();
        assert!(fixture.rooms.get_room(&lobby()).await.is_none());
    }

    #[tokio::test]
    async fn test_closing_room_keeps_attachment_uploaded_in_other_room() {
        // テスト項目: 他のルームの添付 URL を投稿しただけのルームが破棄されても、その添付ファイルは削除されない
        // given (前提条件): lobby の Alice が投稿した添付を garden の Carol も投稿する
        let fixture = Fixture::new();
        let (alice, _alice_rx) = fixture.join("Alice").await;
        let (mut carol, _carol_rx) = fixture.join_room("garden", "Carol").await;
        let send = SendMessageUseCase::new(fixture.rooms.clone());
        let shared = SendMessageInput {
            file_url: Some("/uploads/photo.png".to_string()),
            media_type: Some("image".to_string()),
            ..Default::default()
        };
        send.execute(&alice, shared.clone()).await.unwrap();
        send.execute(&carol, shared).await.unwrap();
        let mut uploads = MockMediaStore::new();
        uploads.expect_delete().never();
        let usecase = fixture.usecase(uploads);

        // when (操作):
        let outcome = usecase.execute(&mut carol).await;

        // then (期待する結果):
        assert_eq!(outcome.left.unwrap().user_count, 0);
        if let Some(cleanup) = outcome.cleanup {
            cleanup.await.unwrap();
        }
        assert!(fixture.rooms.get_room(&lobby()).await.is_some());
    }

    #[tokio::test]
    async fn test_disconnect_without_room_does_nothing() {
        // テスト項目: ルーム未参加のセッションの切断では退出処理が行われない
        // given (前提条件):
        let fixture = Fixture::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(SessionIdFactory::generate(), Timestamp::now());
        fixture
            .connections
            .register(session.id(), tx, session.connected_at())
            .await;
        let usecase = fixture.usecase(MockMediaStore::new());

        // when (操作):
        let outcome = usecase.execute(&mut session).await;

        // then (期待する結果):
        assert!(outcome.left.is_none());
        assert!(outcome.cleanup.is_none());
        assert_eq!(fixture.connections.count().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_idempotent() {
        // テスト項目: 2 回目の切断処理は何もしない
        // given (前提条件):
        let fixture = Fixture::new();
        let (mut alice, _rx) = fixture.join("Alice").await;
        let (_bob, _bob_rx) = fixture.join("Bob").await;
        let usecase = fixture.usecase(MockMediaStore::new());
        usecase.execute(&mut alice).await;

        // when (操作):
        let outcome = usecase.execute(&mut alice).await;

        // then (期待する結果):
        assert!(outcome.left.is_none());
        assert_eq!(fixture.rooms.get_room(&lobby()).await.unwrap().user_count(), 1);
    }

    #[tokio::test]
    async fn test_rejoin_after_destroy_starts_empty() {
        // テスト項目: ルーム破棄後に同名のルームへ参加すると履歴は空から始まる
        // given (前提条件):
        let fixture = Fixture::new();
        let (mut alice, _rx) = fixture.join("Alice").await;
        fixture
            .usecase(MockMediaStore::new())
            .execute(&mut alice)
            .await;

        // when (操作):
        let (tx, _rx2) = mpsc::unbounded_channel();
        let outcome = fixture
            .rooms
            .join(
                lobby(),
                Member::new(
                    SessionIdFactory::generate(),
                    DisplayName::new("Bob".to_string()).unwrap(),
                    Timestamp::now(),
                    tx,
                ),
            )
            .await;

        // then (期待する結果):
        assert!(outcome.history.is_empty());
    }
}
