//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod add_sticker;
pub mod cleanup;
pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod join_room;
pub mod publish_scheduled_room;
pub mod remove_scheduled_room;
pub mod remove_sticker;
pub mod send_message;
pub mod upload_attachment;

pub use add_sticker::AddStickerUseCase;
pub use cleanup::spawn_media_cleanup;
pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::{DisconnectOutcome, DisconnectSessionUseCase};
pub use error::{JoinRoomError, PublishScheduledRoomError, SendMessageError, UploadError};
pub use join_room::JoinRoomUseCase;
pub use publish_scheduled_room::PublishScheduledRoomUseCase;
pub use remove_scheduled_room::RemoveScheduledRoomUseCase;
pub use remove_sticker::RemoveStickerUseCase;
pub use send_message::{SendMessageInput, SendMessageUseCase};
pub use upload_attachment::UploadAttachmentUseCase;
