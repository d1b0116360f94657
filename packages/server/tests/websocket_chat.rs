//! WebSocket integration tests.
//!
//! Drives the JSON event protocol end to end: rooms, messages, stickers
//! and the scheduled-room board.

mod fixtures;

use std::time::Duration;

use fixtures::{TestServer, WsClient, eventually};
use serde_json::json;

#[tokio::test]
async fn test_two_members_chat_and_leave() {
    // テスト項目: 参加・送信・退出の一連の流れで、各メンバーに正しい順序でイベントが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server).await;
    let mut bob = WsClient::connect(&server).await;

    // when (操作): Alice が参加
    alice
        .send("join-room", json!({ "room": "lobby", "name": "Alice" }))
        .await;

    // then (期待する結果): 空の履歴 → 参加通知 → 人数
    assert_eq!(alice.recv_event("chat-history").await, json!([]));
    let notice = alice.recv_event("message").await;
    assert_eq!(notice["kind"], "system");
    assert_eq!(notice["text"], "Alice joined the room");
    assert_eq!(alice.recv_event("user-count").await, 1);

    // when (操作): Bob が参加
    bob.send("join-room", json!({ "room": "lobby", "name": "Bob" }))
        .await;

    // then (期待する結果): Bob には Alice の参加通知を含む履歴が届く
    let history = bob.recv_event("chat-history").await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["text"], "Alice joined the room");
    assert_eq!(bob.recv_event("message").await["text"], "Bob joined the room");
    assert_eq!(bob.recv_event("user-count").await, 2);
    assert_eq!(alice.recv_event("message").await["text"], "Bob joined the room");
    assert_eq!(alice.recv_event("user-count").await, 2);

    // when (操作): Alice がメッセージを送信
    alice.send("send-message", json!({ "text": "hi" })).await;

    // then (期待する結果): 送信者を含む全員に届く
    for client in [&mut alice, &mut bob] {
        let message = client.recv_event("message").await;
        assert_eq!(message["kind"], "user");
        assert_eq!(message["name"], "Alice");
        assert_eq!(message["text"], "hi");
        assert!(message["timestamp"].is_i64());
    }

    // when (操作): Bob が切断
    bob.close().await;

    // then (期待する結果): 退出通知 → 人数
    assert_eq!(alice.recv_event("message").await["text"], "Bob left the room");
    assert_eq!(alice.recv_event("user-count").await, 1);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: 別のルームのメッセージは届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server).await;
    let mut carol = WsClient::connect(&server).await;
    alice.join("lobby", "Alice").await;
    carol.join("garden", "Carol").await;

    // when (操作):
    alice.send("send-message", json!({ "text": "hello lobby" })).await;

    // then (期待する結果):
    assert_eq!(alice.recv_event("message").await["text"], "hello lobby");
    assert!(carol.is_silent_for(Duration::from_millis(200)).await);
}

#[tokio::test]
async fn test_invalid_frames_are_ignored() {
    // テスト項目: 不正なフレームや参加前の送信は無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server).await;

    // when (操作):
    alice.send_text("not json".to_string()).await;
    alice.send("unknown-event", json!({})).await;
    alice.send("send-message", json!({ "text": "too early" })).await;
    alice.send("join-room", json!({ "room": "lobby" })).await;

    // then (期待する結果): 何も届かず、その後の参加は成功する
    assert!(alice.is_silent_for(Duration::from_millis(200)).await);
    assert_eq!(alice.join("lobby", "Alice").await, json!([]));
}

#[tokio::test]
async fn test_second_join_is_ignored() {
    // テスト項目: 参加中のセッションの 2 回目の参加は無視され、人数は変わらない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server).await;
    alice.join("lobby", "Alice").await;

    // when (操作):
    alice
        .send("join-room", json!({ "room": "garden", "name": "Alice" }))
        .await;

    // then (期待する結果):
    assert!(alice.is_silent_for(Duration::from_millis(200)).await);
    let rooms: serde_json::Value = reqwest::get(format!("{}/api/rooms", server.base_url()))
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(rooms.as_array().map(Vec::len), Some(1));
    assert_eq!(rooms[0]["user_count"], 1);
}

#[tokio::test]
async fn test_scheduled_rooms_are_broadcast_to_everyone() {
    // テスト項目: 予定ルームの公開・削除は、ルーム未参加の接続を含む全員に配信される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut publisher = WsClient::connect(&server).await;
    let mut watcher = WsClient::connect(&server).await;
    watcher.join("lobby", "Watcher").await;

    // when (操作): 公開
    publisher
        .send(
            "publish-room",
            json!({ "room": "book-club", "time": "Friday 8pm" }),
        )
        .await;

    // then (期待する結果):
    let board = watcher.recv_event("scheduled-rooms").await;
    assert_eq!(board.as_array().map(Vec::len), Some(1));
    assert_eq!(board[0]["name"], "book-club");
    assert_eq!(board[0]["time"], "Friday 8pm");
    assert_eq!(publisher.recv_event("scheduled-rooms").await, board);

    // when (操作): 削除
    let id = board[0]["id"].as_str().expect("id should be a string");
    publisher.send("remove-scheduled", json!({ "id": id })).await;

    // then (期待する結果):
    assert_eq!(watcher.recv_event("scheduled-rooms").await, json!([]));
    assert_eq!(publisher.recv_event("scheduled-rooms").await, json!([]));

    // 新しい接続には現在の一覧（空）が届く
    let mut late = WsClient::connect_raw(&server).await;
    late.recv_event("stickers").await;
    assert_eq!(late.recv_event("scheduled-rooms").await, json!([]));
}

#[tokio::test]
async fn test_remove_unknown_scheduled_room_is_silent() {
    // テスト項目: 存在しない予定ルームの削除は配信を起こさない
    let server = TestServer::start().await;
    let mut client = WsClient::connect(&server).await;

    client
        .send(
            "remove-scheduled",
            json!({ "id": "00000000-0000-4000-8000-000000000000" }),
        )
        .await;

    assert!(client.is_silent_for(Duration::from_millis(200)).await);
}

#[tokio::test]
async fn test_sticker_message_and_removal() {
    // テスト項目: ステッカー付きメッセージを送信でき、ステッカー削除で一覧と画像ファイルが消える
    // given (前提条件):
    let server = TestServer::start().await;
    let http = reqwest::Client::new();
    let mut alice = WsClient::connect(&server).await;
    alice.join("lobby", "Alice").await;
    let sticker: serde_json::Value = http
        .post(format!("{}/api/stickers", server.base_url()))
        .header("Content-Type", "image/png")
        .body(b"png".to_vec())
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    alice.recv_event("stickers").await;
    let url = sticker["url"].as_str().expect("url should be a string").to_string();
    let path = server.media_path(&url);
    assert!(path.exists());

    // when (操作): ステッカーを送信
    alice.send("send-message", json!({ "stickerUrl": url })).await;

    // then (期待する結果):
    let message = alice.recv_event("message").await;
    assert_eq!(message["stickerUrl"], url.as_str());
    assert!(message.get("text").is_none());

    // when (操作): ステッカーを削除
    alice
        .send("remove-sticker", json!({ "id": sticker["id"] }))
        .await;

    // then (期待する結果):
    assert_eq!(alice.recv_event("stickers").await, json!([]));
    assert!(eventually(|| !path.exists()).await);
}

#[tokio::test]
async fn test_last_leave_deletes_attachments() {
    // テスト項目: 最後のメンバーが退出するとルームが破棄され、添付ファイルが削除される
    // given (前提条件):
    let server = TestServer::start().await;
    let http = reqwest::Client::new();
    let mut alice = WsClient::connect(&server).await;
    alice.join("lobby", "Alice").await;
    let upload: serde_json::Value = http
        .post(format!("{}/api/upload", server.base_url()))
        .header("Content-Type", "video/mp4")
        .body(vec![0u8; 64])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let url = upload["url"].as_str().expect("url should be a string").to_string();
    alice
        .send(
            "send-message",
            json!({ "fileUrl": url, "mediaType": upload["mediaType"] }),
        )
        .await;
    let message = alice.recv_event("message").await;
    assert_eq!(message["fileUrl"], url.as_str());
    assert_eq!(message["mediaType"], "video");
    let path = server.media_path(&url);
    assert!(path.exists());

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    assert!(eventually(|| !path.exists()).await);
    let status = http
        .get(format!("{}/api/rooms/lobby", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .status();
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_room_history_restarts_after_destroy() {
    // テスト項目: 破棄されたルームに再度参加すると履歴は空から始まる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = WsClient::connect(&server).await;
    alice.join("lobby", "Alice").await;
    alice.send("send-message", json!({ "text": "old" })).await;
    alice.recv_event("message").await;
    alice.close().await;

    // when (操作):
    let base_url = server.base_url();
    let gone = async {
        for _ in 0..250 {
            let status = reqwest::get(format!("{base_url}/api/rooms/lobby"))
                .await
                .expect("Failed to send request")
                .status();
            if status == 404 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    };
    assert!(gone.await);
    let mut bob = WsClient::connect(&server).await;

    // then (期待する結果):
    assert_eq!(bob.join("lobby", "Bob").await, json!([]));
}
