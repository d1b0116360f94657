//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 入力からユーザーメッセージを組み立て、参加中のルームに追加・配信する処理
//!
//! ### なぜこのテストが必要か
//! - 送信者を含むルームの全員にメッセージが配信されることを保証
//! - ルーム未参加のセッションからの送信は何も起こさない（静かに無視）ことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：テキスト、添付ファイル、ステッカーの送信
//! - 異常系：ルーム未参加、本文も添付もないメッセージ

use std::sync::Arc;

use crate::domain::{
    Attachment, ChatMessage, DisplayName, MessageContent, RoomRepository, Session, Timestamp,
    ValueObjectError,
};

use super::error::SendMessageError;

/// クライアントから受け取ったメッセージの内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendMessageInput {
    pub text: Option<String>,
    pub file_url: Option<String>,
    pub media_type: Option<String>,
    pub sticker_url: Option<String>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    rooms: Arc<dyn RoomRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 送信者のセッション
    /// * `input` - メッセージの内容
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 追加・配信されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（呼び出し側では無視してよい）
    pub async fn execute(
        &self,
        session: &Session,
        input: SendMessageInput,
    ) -> Result<ChatMessage, SendMessageError> {
        let (room, name) = session.current_room()?;
        let message = build_message(name.clone(), input, Timestamp::now())?;

        self.rooms
            .post(room, &session.id(), message.clone())
            .await?;

        tracing::debug!("Session {} posted to room '{}'", session.id(), room);
        Ok(message)
    }
}

/// 入力からユーザーメッセージを組み立てる
///
/// 空文字列は未指定として扱う。本文・添付・ステッカーのいずれも無ければエラー。
fn build_message(
    name: DisplayName,
    input: SendMessageInput,
    timestamp: Timestamp,
) -> Result<ChatMessage, ValueObjectError> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    let text = non_empty(input.text).map(MessageContent::new).transpose()?;
    let attachment = non_empty(input.file_url).map(|url| Attachment {
        url,
        media_type: non_empty(input.media_type),
    });
    let sticker_url = non_empty(input.sticker_url);

    if text.is_none() && attachment.is_none() && sticker_url.is_none() {
        return Err(ValueObjectError::MessageBodyEmpty);
    }

    Ok(ChatMessage::User {
        name,
        text,
        attachment,
        sticker_url,
        timestamp,
    })
}
