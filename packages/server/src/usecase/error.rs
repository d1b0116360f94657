//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MediaStoreError, RoomError, SessionError, ValueObjectError};

/// ルーム参加のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    /// ルーム名・表示名が不正
    #[error("Invalid join request: {0}")]
    Validation(#[from] ValueObjectError),

    /// 既にルームに参加済み、または切断済み
    #[error("Join rejected: {0}")]
    State(#[from] SessionError),
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// メッセージ内容が不正
    #[error("Invalid message: {0}")]
    Validation(#[from] ValueObjectError),

    /// セッションがルームに参加していない
    #[error("Message dropped: {0}")]
    State(#[from] SessionError),

    /// ルームが存在しない、またはメンバーではない
    #[error("Message dropped: {0}")]
    Room(#[from] RoomError),
}

/// 予定ルーム公開のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishScheduledRoomError {
    /// ルーム名・予定時刻が不正
    #[error("Invalid scheduled room: {0}")]
    Validation(#[from] ValueObjectError),
}

/// アップロードのエラー（アップロードしたクライアントにのみ返す）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error(transparent)]
    Storage(#[from] MediaStoreError),
}
